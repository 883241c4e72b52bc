//! Typed mirror of the audit response schema.
//!
//! Field names follow the JSON keys the model is instructed to produce, so a
//! parsed report serializes back to the same shape the UI consumes.

use serde::{Deserialize, Serialize};

/// Full structured audit of a bid document bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub metadata: Metadata,
    pub go_no_go: GoNoGo,
    pub regras: Rules,
    pub habilitacao: HabilitationDocs,
    pub itens: Vec<BidItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Name of the main file, or a label for a combined bundle.
    pub filename: String,
    pub orgao: String,
    pub numero: String,
    pub objeto: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_abertura: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horario_abertura: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modo_disputa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_estimado: Option<String>,
}

/// Severity attached to each go/no-go check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Critical,
    Warning,
    Info,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Critical, Status::Warning, Status::Info];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Critical => "critical",
            Status::Warning => "warning",
            Status::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationItem {
    pub descricao: String,
    /// "File > Item X.Y"
    pub citation: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoNoGo {
    pub garantia_proposta: CitationItem,
    pub patrimonio_liquido: CitationItem,
    pub visita_tecnica: CitationItem,
    pub amostra: CitationItem,
}

/// A rule value with its source citation. Neither half is required by the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitedValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub prazo_entrega: CitedValue,
    pub vigencia: CitedValue,
    pub condicao_equipamentos: CitedValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocItem {
    pub requisito: String,
    pub citation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabilitationDocs {
    pub juridica: Vec<DocItem>,
    pub fiscal_trabalhista: Vec<DocItem>,
    pub qualificacao_tecnica: Vec<DocItem>,
    pub qualificacao_economica: Vec<DocItem>,
    /// Engineers, technicians, personal certifications (CAT).
    pub equipe_tecnica: Vec<DocItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidItem {
    pub id: i64,
    pub nome: String,
    pub quantidade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unidade: Option<String>,
    pub citation: String,
    /// Line-by-line technical specifications.
    pub specs: Vec<String>,
}

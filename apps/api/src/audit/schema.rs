//! Structured-output schema sent with every audit call.
//!
//! Uses the Gemini `responseSchema` dialect (uppercase type names). The shape is
//! a process-wide constant: every `GenerationRequest` borrows the same value.
//! Keep it in sync with `models::report`; the tests below check both agree.

use std::sync::LazyLock;

use serde_json::{json, Value};

use crate::models::report::Status;

pub static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(build_response_schema);

fn citation_string() -> Value {
    json!({"type": "STRING", "description": "Referência exata: 'NomeArquivo > Item X.Y'."})
}

fn citation_item() -> Value {
    let statuses: Vec<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "descricao": {"type": "STRING", "description": "Texto fiel à exigência do edital."},
            "citation": citation_string(),
            "status": {"type": "STRING", "enum": statuses},
        },
        "required": ["descricao", "citation", "status"],
    })
}

fn doc_item() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "requisito": {
                "type": "STRING",
                "description": "Descrição detalhada do documento ou qualificação exigida."
            },
            "citation": citation_string(),
        },
        "required": ["requisito", "citation"],
    })
}

fn cited_value(value: Value) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {"value": value, "citation": citation_string()},
    })
}

fn doc_list() -> Value {
    json!({"type": "ARRAY", "items": doc_item()})
}

fn build_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "metadata": {
                "type": "OBJECT",
                "properties": {
                    "filename": {"type": "STRING"},
                    "orgao": {"type": "STRING"},
                    "numero": {"type": "STRING"},
                    "objeto": {"type": "STRING"},
                    "data_abertura": {"type": "STRING"},
                    "horario_abertura": {"type": "STRING"},
                    "modo_disputa": {"type": "STRING"},
                    "portal": {
                        "type": "STRING",
                        "description": "Portal onde ocorrerá o pregão (ex: Compras.gov, Licitações-e)."
                    },
                    "valor_estimado": {
                        "type": "STRING",
                        "description": "Valor total estimado da licitação (R$)."
                    },
                },
                "required": ["filename", "orgao", "numero", "objeto"],
            },
            "go_no_go": {
                "type": "OBJECT",
                "properties": {
                    "garantia_proposta": citation_item(),
                    "patrimonio_liquido": citation_item(),
                    "visita_tecnica": citation_item(),
                    "amostra": citation_item(),
                },
                "required": ["garantia_proposta", "patrimonio_liquido", "visita_tecnica", "amostra"],
            },
            "regras": {
                "type": "OBJECT",
                "properties": {
                    "prazo_entrega": cited_value(json!({"type": "STRING"})),
                    "vigencia": cited_value(json!({"type": "STRING"})),
                    "condicao_equipamentos": cited_value(json!({
                        "type": "STRING",
                        "description": "Se os equipamentos devem ser novos/primeiro uso ou se aceita usados."
                    })),
                },
                "required": ["prazo_entrega", "vigencia", "condicao_equipamentos"],
            },
            "habilitacao": {
                "type": "OBJECT",
                "properties": {
                    "juridica": doc_list(),
                    "fiscal_trabalhista": doc_list(),
                    "qualificacao_tecnica": doc_list(),
                    "qualificacao_economica": doc_list(),
                    "equipe_tecnica": {
                        "type": "ARRAY",
                        "items": doc_item(),
                        "description": "Exigências de Engenheiros, Técnicos, Certificações de Pessoas (CAT)."
                    },
                },
                "required": [
                    "juridica",
                    "fiscal_trabalhista",
                    "qualificacao_tecnica",
                    "qualificacao_economica",
                    "equipe_tecnica"
                ],
            },
            "itens": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {"type": "INTEGER"},
                        "nome": {"type": "STRING"},
                        "quantidade": {"type": "STRING"},
                        "unidade": {"type": "STRING"},
                        "citation": citation_string(),
                        "specs": {
                            "type": "ARRAY",
                            "items": {"type": "STRING"},
                            "description": "Lista exaustiva das especificações técnicas linha a linha."
                        },
                    },
                    "required": ["id", "nome", "specs", "quantidade", "citation"],
                },
            },
        },
        "required": ["metadata", "go_no_go", "regras", "habilitacao", "itens"],
    })
}

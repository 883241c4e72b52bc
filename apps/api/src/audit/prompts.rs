// Prompt text for the bid audit call.

/// Audit prompt template. Replace `{filenames}` and `{document_text}` before sending.
///
/// Filled in a single pass so document text containing brace placeholders is left untouched.
pub const AUDIT_PROMPT_TEMPLATE: &str = r#"
    Você é um Auditor de Licitações Públicas (Lei 14.133/21).
    ARQUIVOS: {filenames}
    CONTEXTO: {document_text}
    TAREFA: Auditoria de "Dupla Checagem".

    1. HABILITAÇÃO: Cruzar Edital x TR. Listar Atestados.
    2. EQUIPE TÉCNICA: Profissionais (Engenheiros, Técnicos).
    3. ITENS: Especificações linha a linha do TR.
    4. METADADOS: Portal, Valor, Horário.
    5. CITAÇÕES: "Arquivo > Item".
    6. CONDIÇÃO EQUIPAMENTOS: Verificar se é exigido que sejam "Novos/Primeiro Uso" ou se "Usados/Seminovos" são permitidos.
    "#;

pub const FILENAMES_PLACEHOLDER: &str = "{filenames}";
pub const DOCUMENT_TEXT_PLACEHOLDER: &str = "{document_text}";

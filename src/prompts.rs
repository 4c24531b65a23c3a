//! User-facing chat text
//!
//! Everything the bot says lives here. Messages sent with Markdown formatting
//! use Telegram's legacy syntax, so user text echoed inside them is escaped.

/// Greeting for `/start`
pub fn greeting() -> String {
    "Olá! Eu sou seu bot de controle de gastos. Para registrar um novo gasto, digite /gasto."
        .to_string()
}

pub fn ask_description() -> String {
    "Certo! Qual a *descrição* do gasto? (Ex: Almoço no restaurante)".to_string()
}

pub fn ask_category(description: &str) -> String {
    format!(
        "Ok, a descrição é \"{}\". Agora, qual a *categoria*? (Ex: Alimentação, Transporte, Lazer)",
        escape_markdown(description)
    )
}

pub fn ask_value(category: &str) -> String {
    format!(
        "Entendido, a categoria é \"{}\". Por último, qual o *valor* do gasto? (Ex: 50.75 ou 50,75)",
        escape_markdown(category)
    )
}

pub fn invalid_value() -> String {
    "Valor inválido. Por favor, digite um número positivo para o valor do gasto. (Ex: 50.75)"
        .to_string()
}

/// Confirmation sent right before the submission
pub fn summary(description: &str, category: &str, value: f64) -> String {
    format!(
        "Perfeito! Registrando o gasto:\nDescrição: {}\nCategoria: {}\nValor: *R$ {value:.2}*",
        bold(description),
        bold(category)
    )
}

pub fn submission_accepted() -> String {
    "Gasto enviado para a API com sucesso! ✅".to_string()
}

pub fn submission_rejected(status: u16, body: &str) -> String {
    format!("Erro ao enviar gasto para a API: {status} - {body} 🔴")
}

pub fn submission_unreachable() -> String {
    "Ocorreu um erro ao tentar conectar com a API. Por favor, tente novamente mais tarde. ❌"
        .to_string()
}

/// Escape legacy Markdown markers outside of an entity. Only an opening `[`
/// starts a link, so `]` is left as is.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wrap in a bold entity. Escaping is not allowed inside an entity, so a
/// literal `*` closes the entity, is emitted escaped, and reopens it.
pub fn bold(text: &str) -> String {
    format!("*{}*", text.replace('*', "*\\**"))
}

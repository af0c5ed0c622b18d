//! services/template_renderer.rs
//! Personaliza el mensaje por contacto sustituyendo el placeholder del nombre.

use anyhow::{Context, Result};
use regex::Regex;

/// Saludos que se reescriben a "Saludo!" cuando el contacto no tiene nombre.
const GREETINGS: &[&str] = &["hello", "hi", "hey", "hola", "olá", "ola", "oi"];

#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    placeholder: String,
    fallback_name: String,
    greeting_re: Regex,
    placeholder_re: Regex,
}

impl TemplateRenderer {
    pub fn new(placeholder: &str, fallback_name: &str) -> Result<Self> {
        let escaped = regex::escape(placeholder);

        // "Hello {name}, ..." -> "Hello! ..."
        let greeting_re = Regex::new(&format!(
            r"(?i)\b({})[ \t]+{}(?:[ \t]*[,;:.!])?([ \t]*)",
            GREETINGS.join("|"),
            escaped
        ))
        .context("Regex de saludo inválida")?;

        // Placeholder suelto, con su coma y espacios
        let placeholder_re = Regex::new(&format!(r"{},?[ \t]*", escaped))
            .context("Regex de placeholder inválida")?;

        Ok(Self {
            placeholder: placeholder.to_string(),
            fallback_name: fallback_name.to_string(),
            greeting_re,
            placeholder_re,
        })
    }

    /// true si el nombre existe y no es la etiqueta genérica de "sin nombre"
    pub fn has_name(&self, contact_name: &str) -> bool {
        let name = contact_name.trim();
        !name.is_empty() && name != self.fallback_name
    }

    pub fn render(&self, template: &str, contact_name: &str, has_name: bool) -> String {
        if has_name {
            return template.replace(&self.placeholder, contact_name.trim());
        }

        // El orden importa: primero el saludo, después lo que quede suelto.
        let greeted = self.greeting_re.replace_all(template, "${1}!${2}");
        self.placeholder_re.replace_all(&greeted, "").into_owned()
    }

    /// Atajo: decide `has_name` a partir del propio nombre.
    pub fn render_for(&self, template: &str, contact_name: &str) -> String {
        self.render(template, contact_name, self.has_name(contact_name))
    }
}

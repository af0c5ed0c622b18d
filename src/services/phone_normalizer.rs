//! services/phone_normalizer.rs
//! Deja el teléfono como string de dígitos con prefijo de país.

/// Quita todo lo que no sea dígito y antepone `country_prefix` si falta.
///
/// No valida largo ni plausibilidad: eso lo decide el gateway. Si no queda
/// ningún dígito se devuelve el string vacío tal cual.
pub fn normalize_phone(raw: &str, country_prefix: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() || digits.starts_with(country_prefix) {
        return digits;
    }
    format!("{}{}", country_prefix, digits)
}

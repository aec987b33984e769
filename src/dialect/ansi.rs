use super::Dialect;

/// Plain ANSI dialect: no identifier quoting, `?` placeholders, no upsert.
pub struct Ansi;

impl Dialect for Ansi {
    fn name(&self) -> &'static str {
        "ansi"
    }
}

use regex::Regex;

lazy_static::lazy_static! {
    pub static ref PY_IDENT_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Whether `name` can be emitted as a bare Python class reference.
pub fn is_python_identifier(name: &str) -> bool {
    PY_IDENT_RE.is_match(name)
}

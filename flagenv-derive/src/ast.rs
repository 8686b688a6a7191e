#[derive(Debug)]
pub(crate) struct Record {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
}

#[derive(Debug)]
pub(crate) struct Field {
    /// Identifier as written, `r#type` included.
    pub(crate) ident: String,
    pub(crate) attrs: Attrs,
}

/// String literals are kept as source text and re-emitted verbatim.
#[derive(Debug, Default)]
pub(crate) struct Attrs {
    pub(crate) flag: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) help: Option<String>,
    pub(crate) def: Option<String>,
}

impl Field {
    pub(crate) fn name(&self) -> &str {
        self.ident.strip_prefix("r#").unwrap_or(&self.ident)
    }
}

/// +thaterror:error=field={{.field}}
#[derive(Debug)]
pub struct Tmpl {
    pub(crate) field: String,
}

/// +thaterror
#[derive(Debug)]
pub struct Silent;

/// +thaterror:error=object {{.0}} not found
#[derive(Debug)]
pub struct NotFound(pub String);

/// +thaterror:transparent
/// +thaterror:wrap=NotFound
/// +thaterror:wrap=*"std::io".Error
#[derive(Debug)]
pub struct StoreError {
    pub(super) source: super::zz_generated_thaterror::StoreErrorWrapUnion,
}

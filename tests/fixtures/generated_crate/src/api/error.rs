/// +thaterror:error:start
/// request failed
/// caused by {{.source}}
/// +thaterror:error:end
/// +thaterror:wrap="crate::store::error".StoreError
#[derive(Debug)]
pub struct RequestFailed {
    pub(super) source: super::zz_generated_thaterror::RequestFailedWrapUnion,
    pub(crate) backtrace: std::backtrace::Backtrace,
}

use super::RecordType;

/// A contract's type accessor, submitted by `#[contract(auto_register)]`.
#[doc(hidden)]
pub struct AutoRegister(pub fn() -> RecordType);

inventory::collect!(AutoRegister);

/// Declares every contract annotated with `#[contract(auto_register)]`.
///
/// Contracts declare themselves on first use anyway. Calling this once at startup
/// completes all declarations before records are used from several threads.
/// Returns the number of contracts visited, repeated calls are cheap.
///
/// # Examples
///
/// ```
/// use vc_contract::{Contract, registry};
///
/// #[derive(Contract, Default, Clone, Debug)]
/// #[contract(auto_register)]
/// struct Ping {
///     #[member]
///     seq: f64,
/// }
///
/// fn main() {
///     assert!(registry::auto_register() >= 1);
/// }
/// ```
pub fn auto_register() -> usize {
    let mut count = 0;
    for item in inventory::iter::<AutoRegister> {
        let ty = (item.0)();
        log::trace!("auto registered record type `{ty}`");
        count += 1;
    }
    count
}

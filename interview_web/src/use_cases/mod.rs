// Use cases: failure classification, session bookkeeping and route transition policy.

pub mod classify;
pub mod guard;
pub mod router;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

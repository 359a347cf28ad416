//! Derived read models built by joining raw collections at query time.
//!
//! Views are described as a typed pipeline of stage descriptors
//! ([`pipeline`]) and compiled to a single SQL statement ([`sql`]). Nothing
//! is cached or incrementally maintained; every request recomputes the view.

pub mod channel;
pub mod history;
pub mod listing;
pub mod pipeline;
pub mod sql;

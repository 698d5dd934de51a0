pub mod buckets;
pub mod list;
pub mod login;
pub mod schedule;

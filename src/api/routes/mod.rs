pub mod meta;
pub mod schedules;

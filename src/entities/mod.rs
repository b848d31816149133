pub mod draw_runs;
pub mod registrations;
pub mod winners;

pub use draw_runs as draw_run_entity;
pub use registrations as registration_entity;
pub use winners as winner_entity;
pub use winners::WinnerCategory;

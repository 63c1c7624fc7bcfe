pub mod categories;
pub mod completions;
pub mod courses;
pub mod enrollments;
pub mod roles;
pub mod statuses;
pub mod tasks;
pub mod users;

pub use categories::*;
pub use completions::*;
pub use courses::*;
pub use enrollments::*;
pub use roles::*;
pub use statuses::*;
pub use tasks::*;
pub use users::*;

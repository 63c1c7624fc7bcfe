pub mod utils;

mod courses;
mod enrollments;
mod tasks;
mod users;

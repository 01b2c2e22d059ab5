//! The dashboard's operations, independent of HTTP. Each function validates its input, talks
//! to a [`Store`](crate::database::Store), and logs what it changed.

pub mod classes;
pub mod parents;
pub mod portal;
pub mod staff;
pub mod students;

//! The KMT Tracker site: a server-rendered page whose forms post back
//! to the controllers, which update the visitor's context and redirect.

mod controller;

pub mod router;
pub mod service;

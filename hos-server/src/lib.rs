//! Hours-of-service trip planning server.
//!
//! Turns "drive this load, starting now" into a day-by-day duty log that
//! respects the US property-carrying hours-of-service rules, with fuel
//! stops placed at real stations along the way.

pub mod config;
pub mod domain;
pub mod fuel;
pub mod hos;
pub mod route;
pub mod web;

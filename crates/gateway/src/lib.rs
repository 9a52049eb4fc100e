//! `recap-gateway` — the HTTP front door for recap generation.
//!
//! `POST /api/recap` spawns one MCP tool-server subprocess, collects
//! GitHub activity and local notes through it, and assembles the recap
//! document. One subprocess and one client per request; nothing is
//! shared between in-flight recaps.

pub mod api;
pub mod cli;
pub mod report;
pub mod state;

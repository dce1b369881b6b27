//! Plugin surface: fixed pipeline hook points and the plugin contract.

pub mod hooks;

pub use hooks::{CoreHook, DrawHook, HookRegistry, Plugin, SeriesDrawHook, SeriesHook};

pub mod anchor;
pub mod columns;
pub mod config;
pub mod focus;
pub mod items;
pub mod mode;
pub mod position;
pub mod selection;

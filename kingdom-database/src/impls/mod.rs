pub mod level_roles;
pub mod leveling;
pub mod leveling_config;

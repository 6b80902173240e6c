//! Built-in node classes
//!
//! - Structure: [`System`], [`Peripheral`], [`Port`]
//! - Settings: [`Boolean`], [`Natural`], [`Integer`], [`Real`],
//!   [`StringSetting`], all cast-able as [`AnySetting`]
//! - Debugging: [`Tracer`]

mod setting;
mod system;
mod tracer;

pub use setting::{
    AnySetting, Boolean, Integer, Natural, Real, Setting, SettingNode, SettingType, StringSetting,
};
pub use system::{Peripheral, Port, System};
pub use tracer::Tracer;

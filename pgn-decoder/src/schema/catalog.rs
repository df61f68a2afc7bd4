//! Compiled-in PGN catalog
//!
//! Hand-picked J1939 parameter groups reported by the fleet gateway.

use super::database::{ByteRange, MessageDefinition, ParameterDefinition};

/// Fuel Consumption (Liquid)
pub const FUEL_CONSUMPTION: &str = "18FEE900";
/// Fuel Economy (Liquid)
pub const FUEL_ECONOMY: &str = "18FEF200";
/// Fuel level
pub const FUEL_LEVEL: &str = "0C00EF47";
/// Engine Hours, Revolutions (HOURS)
pub const ENGINE_HOURS: &str = "18FEE500";
/// Operation State
pub const OPERATION_STATE: &str = "1CFF1404";

/// Definitions making up the built-in registry
pub fn builtin_definitions() -> Vec<MessageDefinition> {
    vec![
        MessageDefinition::new(
            FUEL_CONSUMPTION,
            "Fuel Consumption (Liquid)",
            vec![ParameterDefinition::new(
                "Total Fuel Used",
                ByteRange::Inclusive { start: 4, end: 7 },
                0,
                0.5,
                "l",
            )],
        ),
        MessageDefinition::new(
            FUEL_ECONOMY,
            "Fuel Economy (Liquid)",
            vec![ParameterDefinition::new(
                "Fuel Rate",
                ByteRange::Inclusive { start: 0, end: 1 },
                0,
                0.05,
                "l/h",
            )],
        ),
        MessageDefinition::new(
            FUEL_LEVEL,
            "Fuel level",
            vec![ParameterDefinition::new(
                "Fuel Level",
                ByteRange::Single(1),
                0,
                0.4,
                "%",
            )],
        ),
        MessageDefinition::new(
            ENGINE_HOURS,
            "Engine Hours, Revolutions (HOURS)",
            vec![ParameterDefinition::new(
                "Engine Total Hours of Operation",
                ByteRange::Inclusive { start: 0, end: 3 },
                0,
                0.05,
                "h",
            )],
        ),
        MessageDefinition::new(
            OPERATION_STATE,
            "Operation State",
            vec![ParameterDefinition::new(
                "Status",
                ByteRange::Single(0),
                0,
                1.0,
                "int",
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let registry = SchemaRegistry::builtin().unwrap();
        let stats = registry.stats();
        assert_eq!(stats.num_messages, 5);
        assert_eq!(stats.num_parameters, 5);
        assert_eq!(
            registry.identifiers(),
            vec![FUEL_LEVEL, ENGINE_HOURS, FUEL_CONSUMPTION, FUEL_ECONOMY, OPERATION_STATE]
        );
    }

    #[test]
    fn test_builtin_layouts() {
        let registry = SchemaRegistry::builtin().unwrap();

        let total_fuel = &registry.lookup(FUEL_CONSUMPTION).unwrap().parameters[0];
        assert_eq!(total_fuel.byte_range, ByteRange::Inclusive { start: 4, end: 7 });
        assert_eq!(total_fuel.resolution, 0.5);
        assert_eq!(total_fuel.label(), "Total Fuel Used (l)");

        let hours = registry.lookup(ENGINE_HOURS).unwrap();
        assert_eq!(hours.display_name, "Engine Hours, Revolutions (HOURS)");
        assert_eq!(hours.required_bytes(), 4);

        let status = &registry.lookup(OPERATION_STATE).unwrap().parameters[0];
        assert_eq!(status.byte_range, ByteRange::Single(0));
        assert_eq!(status.label(), "Status (int)");
    }
}

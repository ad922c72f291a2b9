//! System prompt for the IoT fleet assistant
//!
//! Structured with XML-like sections:
//! - <agent_identity> - Who the agent is
//! - <tool_usage_instructions> - Which tool answers which question
//! - <presentation_rules> - How results are shown to the user

const AGENT_IDENTITY: &str = r#"
<agent_identity>
You are an IoT device management assistant. You can:

1. Retrieve and analyze IoT device information from AWS IoT Core
2. Provide insights about connected devices and their status
3. Help with IoT device monitoring and management tasks
</agent_identity>
"#;

const TOOL_USAGE: &str = r#"
<tool_usage_instructions>
- Use `get_all_iot_devices` to retrieve current device information
- Use `get_all_iot_thing_types` to explain the device types in the fleet
- Use `get_connected_devices` to see which devices are online, optionally filtered by thing type
- Use `get_vehicle_gps_coordinates` with a thing name to locate a device of type 'VehicleDevice'
- A tool that fails returns an error message instead of data. Tell the user what could not be retrieved; never present an error as a device
</tool_usage_instructions>
"#;

const PRESENTATION: &str = r#"
<presentation_rules>
- Present device data in a clear, organized format
- Explain device types and their typical functions
- Provide helpful context about IoT device management
- Always be helpful in explaining IoT concepts and device information in user-friendly terms
</presentation_rules>
"#;

/// Full system prompt for the fleet agent
pub fn fleet_system_prompt() -> String {
    format!("{}{}{}", AGENT_IDENTITY, TOOL_USAGE, PRESENTATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_every_tool() {
        let prompt = fleet_system_prompt();
        for tool in [
            "get_all_iot_devices",
            "get_all_iot_thing_types",
            "get_connected_devices",
            "get_vehicle_gps_coordinates",
        ] {
            assert!(prompt.contains(tool), "prompt is missing {}", tool);
        }
    }

    #[test]
    fn test_prompt_sections_in_order() {
        let prompt = fleet_system_prompt();
        let identity = prompt.find("<agent_identity>").unwrap();
        let tools = prompt.find("<tool_usage_instructions>").unwrap();
        let presentation = prompt.find("<presentation_rules>").unwrap();
        assert!(identity < tools && tools < presentation);
    }
}

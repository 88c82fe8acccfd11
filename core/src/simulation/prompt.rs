use super::SimulationRequest;
use crate::providers::WeatherSnapshot;

pub const SYSTEM_PERSONA: &str =
    "You are the TERRA-X Simulation Oracle. Ground your output in realistic atmospheric science.";

/// Build the user prompt for a scenario. Deterministic for a given input.
///
/// Continuation lines carry a four-space indent and the section header is
/// spelled `CHANG_VARS`.
pub fn compose_prompt(req: &SimulationRequest, baseline: Option<&WeatherSnapshot>) -> String {
    let baseline_line = baseline
        .map(|w| {
            format!(
                "\nREAL-TIME BASELINE for {}: Temp {}C, {}",
                req.location, w.temp, w.desc
            )
        })
        .unwrap_or_default();
    format!(
        "Analyze this planetary simulation for {location}.\n    \
         {baseline_line}\n    \n    \
         CHANG_VARS:\n    \
         - CO2: {co2}%\n    \
         - Pop: {pop}%\n    \
         - Econ: {econ}%\n    \
         - Resources: {res}%\n    \n    \
         TASK:\n    \
         1. Predict the outcome in plain language.\n    \
         2. Respond as a professional Intelligence Engine.\n    \
         3. Max 50 words.\n    \
         4. Format: One paragraph prediction + one 'STRATEGIC ADVICE' sentence.",
        location = req.location,
        co2 = req.carbon_change,
        pop = req.pop_growth,
        econ = req.econ_shift,
        res = req.resource_use,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amazon() -> SimulationRequest {
        SimulationRequest {
            location: "Amazon".into(),
            lat: -3.1,
            lon: -60.0,
            carbon_change: 20,
            pop_growth: 5,
            econ_shift: -10,
            resource_use: 15,
        }
    }

    #[test]
    fn prompt_embeds_all_parameters() {
        let p = compose_prompt(&amazon(), None);
        assert!(p.starts_with("Analyze this planetary simulation for Amazon."));
        assert!(p.contains("- CO2: 20%"));
        assert!(p.contains("- Pop: 5%"));
        assert!(p.contains("- Econ: -10%"));
        assert!(p.contains("- Resources: 15%"));
        assert!(p.contains("Max 50 words"));
        assert!(p.contains("STRATEGIC ADVICE"));
        assert!(!p.contains("REAL-TIME BASELINE"));
    }

    #[test]
    fn baseline_line_included_when_present() {
        let w = WeatherSnapshot {
            temp: 27.5,
            desc: "light rain".into(),
            humidity: 88,
        };
        let p = compose_prompt(&amazon(), Some(&w));
        assert!(p.contains("REAL-TIME BASELINE for Amazon: Temp 27.5C, light rain"));
    }

    #[test]
    fn prompt_text_is_exact() {
        let w = WeatherSnapshot {
            temp: 25.5,
            desc: "overcast clouds".into(),
            humidity: 90,
        };
        let expected = "Analyze this planetary simulation for Amazon.\n    \n\
REAL-TIME BASELINE for Amazon: Temp 25.5C, overcast clouds\n    \n    CHANG_VARS:\n    \
- CO2: 20%\n    - Pop: 5%\n    - Econ: -10%\n    - Resources: 15%\n    \n    TASK:\n    \
1. Predict the outcome in plain language.\n    \
2. Respond as a professional Intelligence Engine.\n    \
3. Max 50 words.\n    \
4. Format: One paragraph prediction + one 'STRATEGIC ADVICE' sentence.";
        assert_eq!(compose_prompt(&amazon(), Some(&w)), expected);

        let without = compose_prompt(&amazon(), None);
        assert!(without.starts_with("Analyze this planetary simulation for Amazon.\n    \n    \n    CHANG_VARS:\n"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(compose_prompt(&amazon(), None), compose_prompt(&amazon(), None));
    }
}

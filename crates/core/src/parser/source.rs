use once_cell::sync::Lazy;
use regex::Regex;

static RE_SIMULATION_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-Dgatling\.simulationClass=([a-zA-Z0-9.]+)").expect("valid regex")
});

/// First simulation class named by a `-Dgatling.simulationClass=` flag in a
/// build configuration.
pub fn simulation_class_from_build_config(config: &str) -> Option<String> {
    config.lines().find_map(|line| {
        let line = line.replace("&apos;", "");
        RE_SIMULATION_CLASS
            .captures(&line)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// `a.b.Sim` -> `a/b/Sim.scala`
pub fn simulation_source_path(simulation_class: &str) -> String {
    format!("{}.scala", simulation_class.replace('.', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_class_in_quoted_maven_goal() {
        let xml = "<project>\n  <targets>clean test -Dgatling.simulationClass=&apos;com.acme.load.CheckoutSimulation&apos; -Pperf</targets>\n</project>";
        assert_eq!(
            simulation_class_from_build_config(xml).as_deref(),
            Some("com.acme.load.CheckoutSimulation")
        );
    }

    #[test]
    fn no_flag_no_class() {
        assert_eq!(simulation_class_from_build_config("mvn test"), None);
    }

    #[test]
    fn class_maps_to_scala_path() {
        assert_eq!(
            simulation_source_path("com.acme.load.CheckoutSimulation"),
            "com/acme/load/CheckoutSimulation.scala"
        );
    }
}

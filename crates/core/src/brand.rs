use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Brand {
    Shutterfly,
    TinyPrints,
    Unrecognized,
}

impl Brand {
    pub const PRIMARY: Brand = Brand::Shutterfly;
    pub const KNOWN: [Brand; 2] = [Brand::Shutterfly, Brand::TinyPrints];

    pub fn short_name(self) -> Option<&'static str> {
        match self {
            Brand::Shutterfly => Some("sfly"),
            Brand::TinyPrints => Some("tp"),
            Brand::Unrecognized => None,
        }
    }

    pub fn from_short_name(name: &str) -> Option<Brand> {
        let name = name.trim();
        Brand::KNOWN
            .into_iter()
            .find(|b| b.short_name().is_some_and(|s| s.eq_ignore_ascii_case(name)))
    }
}

/// Environments that only exist for one brand. Anything else belongs to the
/// primary brand.
const BRAND_ENVIRONMENTS: &[(&str, Brand)] = &[("lnp", Brand::TinyPrints)];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandEnvironment {
    pub brand: Brand,
    pub environment: String,
}

impl BrandEnvironment {
    pub fn unrecognized() -> Self {
        Self {
            brand: Brand::Unrecognized,
            environment: String::new(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.brand != Brand::Unrecognized
    }

    /// Environment key used in metric paths: the bare environment for the
    /// primary brand, `<brand>-<environment>` for the others.
    pub fn effective_environment(&self) -> Option<String> {
        match self.brand {
            Brand::Unrecognized => None,
            b if b == Brand::PRIMARY => Some(self.environment.clone()),
            b => b
                .short_name()
                .map(|short| format!("{short}-{}", self.environment)),
        }
    }
}

/// Resolve brand and environment from a job name.
///
/// Job names look like `<suite>-<env>-<target>` for the primary brand and
/// `<suite>-<brand>-<env>-<target>` otherwise. Names that fit neither shape
/// resolve to [`Brand::Unrecognized`].
pub fn resolve(project_name: &str) -> BrandEnvironment {
    let tokens: Vec<&str> = project_name.split('-').map(str::trim).collect();
    if tokens.len() < 3 {
        return BrandEnvironment::unrecognized();
    }

    let (brand, environment) = match Brand::from_short_name(tokens[1]) {
        Some(brand) if tokens.len() >= 4 => (brand, tokens[2]),
        Some(_) => return BrandEnvironment::unrecognized(),
        None => (brand_for_environment(tokens[1]), tokens[1]),
    };

    if environment.is_empty()
        || !environment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return BrandEnvironment::unrecognized();
    }

    BrandEnvironment {
        brand,
        environment: environment.to_string(),
    }
}

fn brand_for_environment(environment: &str) -> Brand {
    BRAND_ENVIRONMENTS
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(environment))
        .map(|(_, brand)| *brand)
        .unwrap_or(Brand::PRIMARY)
}

//! Fixed vehicle catalog for the Turkish new-car market
//!
//! Brand, model, and package definitions with approximate 2024 TL list
//! prices, plus the year range and pricing multipliers the generator
//! applies. The catalog is compiled in; it is the single source of truth
//! for what the generator can produce.

/// One model entry: ordered packages (cheapest first), base list price,
/// market segment.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub name: &'static str,
    pub packages: &'static [&'static str],
    pub base_price: f64,
    pub segment: &'static str,
}

/// All models of one brand.
#[derive(Debug, Clone, Copy)]
pub struct BrandSpec {
    pub name: &'static str,
    pub models: &'static [ModelSpec],
}

const fn m(
    name: &'static str,
    packages: &'static [&'static str],
    base_price: f64,
    segment: &'static str,
) -> ModelSpec {
    ModelSpec {
        name,
        packages,
        base_price,
        segment,
    }
}

const TOYOTA: &[ModelSpec] = &[
    m("Corolla", &["Dream", "Flame", "Passion", "Vision"], 1_250_000.0, "sedan_c"),
    m("Yaris", &["Dream", "Flame", "Vision"], 950_000.0, "hatchback_b"),
    m("C-HR", &["Dream", "Flame", "Passion"], 1_500_000.0, "suv_c"),
    m("RAV4", &["Dream", "Flame", "Passion", "Adventure"], 2_200_000.0, "suv_d"),
    m("Yaris Cross", &["Dream", "Flame", "Adventure"], 1_200_000.0, "suv_b"),
];

const HONDA: &[ModelSpec] = &[
    m("Civic", &["Elegance", "Executive", "RS"], 1_350_000.0, "sedan_c"),
    m("City", &["Elegance", "Executive"], 1_050_000.0, "sedan_b"),
    m("HR-V", &["Elegance", "Executive", "Advance"], 1_400_000.0, "suv_c"),
    m("ZR-V", &["Elegance", "Advance", "Sport"], 1_750_000.0, "suv_c"),
];

const VOLKSWAGEN: &[ModelSpec] = &[
    m("Passat", &["Business", "Elegance", "R-Line"], 2_100_000.0, "sedan_d"),
    m("Golf", &["Impression", "Style", "R-Line"], 1_450_000.0, "hatchback_c"),
    m("Polo", &["Life", "Style", "R-Line"], 1_000_000.0, "hatchback_b"),
    m("T-Roc", &["Life", "Style", "R-Line"], 1_550_000.0, "suv_c"),
    m("Tiguan", &["Life", "Elegance", "R-Line"], 2_300_000.0, "suv_d"),
    m("T-Cross", &["Life", "Style", "R-Line"], 1_150_000.0, "suv_b"),
];

const HYUNDAI: &[ModelSpec] = &[
    m("Tucson", &["Style", "Elite", "Elite Plus"], 1_600_000.0, "suv_c"),
    m("i20", &["Jump", "Style", "Elite"], 850_000.0, "hatchback_b"),
    m("Bayon", &["Jump", "Style", "Elite"], 900_000.0, "suv_b"),
    m("Elantra", &["Style", "Elite", "Elite Plus"], 1_250_000.0, "sedan_c"),
    m("Kona", &["Style", "Elite"], 1_300_000.0, "suv_b"),
];

const RENAULT: &[ModelSpec] = &[
    m("Clio", &["Joy", "Touch", "Icon"], 850_000.0, "hatchback_b"),
    m("Megane", &["Joy", "Touch", "Icon"], 1_150_000.0, "sedan_c"),
    m("Captur", &["Joy", "Touch", "Icon"], 1_200_000.0, "suv_b"),
    m("Taliant", &["Joy", "Touch", "Icon"], 780_000.0, "sedan_b"),
    m("Austral", &["Techno", "Iconic", "Esprit Alpine"], 1_800_000.0, "suv_c"),
];

const FIAT: &[ModelSpec] = &[
    m("Egea Sedan", &["Easy", "Urban", "Urban Plus", "Lounge"], 800_000.0, "sedan_c"),
    m("Egea Hatchback", &["Easy", "Urban", "Urban Plus", "Lounge"], 820_000.0, "hatchback_c"),
    m("Egea Cross", &["Urban", "Urban Plus", "Lounge"], 950_000.0, "suv_c"),
    m("500", &["Pop", "Lounge", "Sport"], 850_000.0, "hatchback_a"),
];

const BMW: &[ModelSpec] = &[
    m("3 Serisi", &["First Edition", "Sport Line", "M Sport"], 2_800_000.0, "sedan_d_premium"),
    m("5 Serisi", &["Sport Line", "Luxury Line", "M Sport"], 4_200_000.0, "sedan_e_premium"),
    m("X1", &["sDrive", "xLine", "M Sport"], 2_500_000.0, "suv_c_premium"),
    m("X3", &["xLine", "M Sport", "M Sport X"], 3_400_000.0, "suv_d_premium"),
];

const MERCEDES: &[ModelSpec] = &[
    m("A Serisi", &["Style", "Progressive", "AMG"], 2_300_000.0, "hatchback_c_premium"),
    m("C Serisi", &["Avantgarde", "AMG", "Exclusive"], 3_000_000.0, "sedan_d_premium"),
    m("E Serisi", &["Avantgarde", "AMG", "Exclusive"], 4_500_000.0, "sedan_e_premium"),
    m("GLA", &["Style", "Progressive", "AMG"], 2_600_000.0, "suv_c_premium"),
];

const AUDI: &[ModelSpec] = &[
    m("A3", &["Attraction", "Design", "S Line"], 2_200_000.0, "sedan_c_premium"),
    m("A4", &["Design", "S Line", "Advanced"], 2_900_000.0, "sedan_d_premium"),
    m("Q3", &["Design", "S Line", "Advanced"], 2_700_000.0, "suv_c_premium"),
    m("Q5", &["Design", "S Line", "Advanced"], 3_600_000.0, "suv_d_premium"),
];

const KIA: &[ModelSpec] = &[
    m("Sportage", &["Cool", "Prestige", "GT-Line"], 1_500_000.0, "suv_c"),
    m("Ceed", &["Cool", "Prestige", "GT-Line"], 1_200_000.0, "hatchback_c"),
    m("Stonic", &["Cool", "Prestige"], 1_050_000.0, "suv_b"),
    m("Picanto", &["Cool", "Prestige"], 700_000.0, "hatchback_a"),
];

const PEUGEOT: &[ModelSpec] = &[
    m("208", &["Active", "Allure", "GT"], 950_000.0, "hatchback_b"),
    m("308", &["Active", "Allure", "GT"], 1_350_000.0, "hatchback_c"),
    m("2008", &["Active", "Allure", "GT"], 1_250_000.0, "suv_b"),
    m("3008", &["Active", "Allure", "GT"], 1_700_000.0, "suv_c"),
];

const SKODA: &[ModelSpec] = &[
    m("Octavia", &["Ambition", "Style", "RS"], 1_400_000.0, "sedan_c"),
    m("Superb", &["Ambition", "Style", "Laurin & Klement"], 2_000_000.0, "sedan_d"),
    m("Karoq", &["Ambition", "Style"], 1_500_000.0, "suv_c"),
    m("Fabia", &["Ambition", "Style"], 900_000.0, "hatchback_b"),
];

const DACIA: &[ModelSpec] = &[
    m("Duster", &["Essential", "Comfort", "Prestige"], 1_050_000.0, "suv_c"),
    m("Sandero", &["Essential", "Comfort", "Stepway"], 700_000.0, "hatchback_b"),
    m("Jogger", &["Essential", "Comfort", "Extreme"], 950_000.0, "mpv"),
];

const NISSAN: &[ModelSpec] = &[
    m("Qashqai", &["Visia", "Acenta", "Tekna"], 1_500_000.0, "suv_c"),
    m("Juke", &["Visia", "Acenta", "Tekna"], 1_150_000.0, "suv_b"),
    m("X-Trail", &["Acenta", "N-Connecta", "Tekna"], 2_000_000.0, "suv_d"),
];

const OPEL: &[ModelSpec] = &[
    m("Corsa", &["Edition", "Elegance", "GS Line"], 900_000.0, "hatchback_b"),
    m("Astra", &["Edition", "Elegance", "GS Line"], 1_200_000.0, "hatchback_c"),
    m("Crossland", &["Edition", "Elegance", "GS Line"], 1_100_000.0, "suv_b"),
    m("Grandland", &["Edition", "Elegance", "GS Line"], 1_600_000.0, "suv_c"),
];

const CITROEN: &[ModelSpec] = &[
    m("C3", &["Feel", "Shine", "Max"], 850_000.0, "hatchback_b"),
    m("C4", &["Feel", "Shine", "Max"], 1_200_000.0, "hatchback_c"),
    m("C5 Aircross", &["Feel", "Shine", "Max"], 1_600_000.0, "suv_c"),
];

const VOLVO: &[ModelSpec] = &[
    m("XC40", &["Core", "Plus", "Ultimate"], 2_400_000.0, "suv_c_premium"),
    m("XC60", &["Core", "Plus", "Ultimate"], 3_500_000.0, "suv_d_premium"),
    m("S60", &["Core", "Plus", "Ultimate"], 2_800_000.0, "sedan_d_premium"),
];

const TOGG: &[ModelSpec] = &[
    m("T10X", &["Standart", "Uzun Menzil", "Ileri"], 1_350_000.0, "suv_c"),
];

const CUPRA: &[ModelSpec] = &[
    m("Formentor", &["V", "VZ"], 1_800_000.0, "suv_c"),
    m("Leon", &["V", "VZ"], 1_500_000.0, "hatchback_c"),
];

const SEAT: &[ModelSpec] = &[
    m("Ibiza", &["Reference", "Style", "FR"], 900_000.0, "hatchback_b"),
    m("Arona", &["Reference", "Style", "FR"], 1_050_000.0, "suv_b"),
];

/// The full catalog: 20 brands, 74 models.
pub const CATALOG: &[BrandSpec] = &[
    BrandSpec { name: "Toyota", models: TOYOTA },
    BrandSpec { name: "Honda", models: HONDA },
    BrandSpec { name: "Volkswagen", models: VOLKSWAGEN },
    BrandSpec { name: "Hyundai", models: HYUNDAI },
    BrandSpec { name: "Renault", models: RENAULT },
    BrandSpec { name: "Fiat", models: FIAT },
    BrandSpec { name: "BMW", models: BMW },
    BrandSpec { name: "Mercedes-Benz", models: MERCEDES },
    BrandSpec { name: "Audi", models: AUDI },
    BrandSpec { name: "Kia", models: KIA },
    BrandSpec { name: "Peugeot", models: PEUGEOT },
    BrandSpec { name: "Skoda", models: SKODA },
    BrandSpec { name: "Dacia", models: DACIA },
    BrandSpec { name: "Nissan", models: NISSAN },
    BrandSpec { name: "Opel", models: OPEL },
    BrandSpec { name: "Citroen", models: CITROEN },
    BrandSpec { name: "Volvo", models: VOLVO },
    BrandSpec { name: "TOGG", models: TOGG },
    BrandSpec { name: "Cupra", models: CUPRA },
    BrandSpec { name: "Seat", models: SEAT },
];

/// Model years covered by the catalog, with the price multiplier per year
/// (2024 is the base year).
pub const YEAR_MULTIPLIERS: &[(i32, f64)] = &[
    (2020, 0.68),
    (2021, 0.74),
    (2022, 0.82),
    (2023, 0.91),
    (2024, 1.00),
    (2025, 1.08),
];

/// Oldest model year in the catalog
pub const YEAR_MIN: i32 = 2020;

/// Newest model year in the catalog
pub const YEAR_MAX: i32 = 2025;

/// Prices are quoted in steps of this size (TL).
pub const PRICE_STEP: f64 = 10_000.0;

/// Price multiplier for a model year, `None` outside the catalog range.
pub fn year_multiplier(year: i32) -> Option<f64> {
    YEAR_MULTIPLIERS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, mult)| *mult)
}

/// Price multiplier for a package tier. Spreads an 18% premium linearly
/// from the base package to the top one; a single-package model gets 1.0.
pub fn package_multiplier(package_index: usize, package_count: usize) -> f64 {
    if package_count <= 1 {
        return 1.0;
    }
    1.0 + (package_index as f64 / (package_count - 1) as f64) * 0.18
}

/// Round a raw price to the nearest quoting step.
pub fn round_price(value: f64) -> i64 {
    ((value / PRICE_STEP).round() * PRICE_STEP) as i64
}

/// Look up a brand by name.
pub fn find_brand(brand: &str) -> Option<&'static BrandSpec> {
    CATALOG.iter().find(|b| b.name == brand)
}

/// Look up a model under a brand.
pub fn find_model(brand: &str, model: &str) -> Option<&'static ModelSpec> {
    find_brand(brand)?.models.iter().find(|m| m.name == model)
}

/// One concrete (brand, model, year, package) choice with its pricing
/// multipliers resolved.
#[derive(Debug, Clone)]
pub struct Combination {
    pub brand: &'static str,
    pub model: &'static str,
    pub package: &'static str,
    pub year: i32,
    pub base_price: f64,
    pub year_multiplier: f64,
    pub package_multiplier: f64,
}

/// Enumerate every (brand, model, year, package) combination the catalog
/// allows, in catalog order.
pub fn all_combinations() -> Vec<Combination> {
    let mut combinations = Vec::new();
    for brand in CATALOG {
        for model in brand.models {
            for &(year, year_mult) in YEAR_MULTIPLIERS {
                for (pkg_idx, &package) in model.packages.iter().enumerate() {
                    combinations.push(Combination {
                        brand: brand.name,
                        model: model.name,
                        package,
                        year,
                        base_price: model.base_price,
                        year_multiplier: year_mult,
                        package_multiplier: package_multiplier(pkg_idx, model.packages.len()),
                    });
                }
            }
        }
    }
    combinations
}

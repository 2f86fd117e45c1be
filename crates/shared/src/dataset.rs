//! Static intel on the companies featured in the exposé.
//!
//! Emission series and pollution readings are left out; the briefing only
//! needs identities, claims and scores.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Company {
    pub id: &'static str,
    pub company: &'static str,
    /// Short uppercase label used by the target-lock overlay.
    pub scan_label: &'static str,
    pub sector: &'static str,
    /// What the company says about itself.
    pub claim: &'static str,
    pub evidence: &'static str,
    pub deception_score: u8,
    pub hq_label: &'static str,
}

pub const COMPANIES: &[Company] = &[
    Company {
        id: "shell-01",
        company: "Shell",
        scan_label: "SHELL",
        sector: "Fossil Fuels",
        claim: "We're committed to achieving net-zero emissions by 2050",
        evidence: "Expanded fossil fuel extraction operations by 12.3% in 2023, while green energy investment dropped 8%",
        deception_score: 94,
        hq_label: "London, UK",
    },
    Company {
        id: "exxon-01",
        company: "ExxonMobil",
        scan_label: "EXXON",
        sector: "Fossil Fuels",
        claim: "Leading the industry toward carbon-neutral operations",
        evidence: "Spent $41M lobbying against climate policy (2019-2024) while running green marketing campaigns worth $78M",
        deception_score: 97,
        hq_label: "Irving, TX",
    },
    Company {
        id: "bp-01",
        company: "BP",
        scan_label: "BP",
        sector: "Fossil Fuels",
        claim: "Beyond Petroleum — reimagining energy for people and planet",
        evidence: "Capital expenditure: 94.7% fossil fuels, 5.3% renewables. Rebranded back to 'petroleum' focus in 2023",
        deception_score: 91,
        hq_label: "London, UK",
    },
    Company {
        id: "nestle-01",
        company: "Nestlé",
        scan_label: "NESTLÉ",
        sector: "Food & Beverage",
        claim: "All our products will be 100% sustainably sourced by 2025",
        evidence: "2023 audit found child labor in 34% of cocoa farms. Extracted 50M gallons/day from drought-stricken aquifers",
        deception_score: 88,
        hq_label: "Vevey, Switzerland",
    },
    Company {
        id: "coca-cola-01",
        company: "Coca-Cola",
        scan_label: "COCA-COLA",
        sector: "Beverage",
        claim: "A World Without Waste — collecting and recycling every bottle by 2030",
        evidence: "Ranked #1 global plastic polluter for 6 consecutive years. 3.2M metric tons of virgin plastic produced in 2023",
        deception_score: 93,
        hq_label: "Atlanta, GA",
    },
    Company {
        id: "volkswagen-01",
        company: "Volkswagen",
        scan_label: "VOLKSWAGEN",
        sector: "Automotive",
        claim: "CleanDiesel — the most environmentally responsible technology",
        evidence: "Installed defeat devices in 11M vehicles worldwide to cheat emissions tests. Real NOx output 40x legal limits",
        deception_score: 99,
        hq_label: "Wolfsburg, Germany",
    },
    Company {
        id: "chevron-01",
        company: "Chevron",
        scan_label: "CHEVRON",
        sector: "Fossil Fuels",
        claim: "Advancing a lower carbon future for all",
        evidence: "Ecuadorian operations dumped 16B gallons toxic waste in Amazon. Court-ordered $9.5B cleanup still unpaid",
        deception_score: 95,
        hq_label: "San Francisco, CA",
    },
    Company {
        id: "amazon-01",
        company: "Amazon",
        scan_label: "AMAZON",
        sector: "E-commerce/Tech",
        claim: "The Climate Pledge: Net-zero carbon emissions by 2040",
        evidence: "Carbon footprint grew 40% since pledge (2019-2023). Generated 709M lbs of plastic packaging waste in 2023",
        deception_score: 86,
        hq_label: "Seattle, WA",
    },
    Company {
        id: "totalenergies-01",
        company: "TotalEnergies",
        scan_label: "TOTALENERGIES",
        sector: "Fossil Fuels",
        claim: "On the path to carbon neutrality by 2050",
        evidence: "Launched 17 new oil/gas projects in Africa (2021-2024). Renewable spending: 4% of total capex vs. promised 25%",
        deception_score: 92,
        hq_label: "Paris, France",
    },
    Company {
        id: "rwe-01",
        company: "RWE",
        scan_label: "RWE",
        sector: "Energy",
        claim: "Growing Green — Europe's renewable energy leader",
        evidence: "Remains EU's largest CO₂ emitter. Demolished 5 German villages (2020-2023) to expand lignite coal mining",
        deception_score: 96,
        hq_label: "Essen, Germany",
    },
    Company {
        id: "shein-01",
        company: "Shein",
        scan_label: "SHEIN",
        sector: "Fast Fashion",
        claim: "Making beauty accessible to all through sustainable practice",
        evidence: "Produces 6.3M tons of CO2e annually. 15% of material is plastic derived. 85 hour work weeks in factories.",
        deception_score: 98,
        hq_label: "Singapore",
    },
    Company {
        id: "zara-01",
        company: "Inditex (Zara)",
        scan_label: "INDITEX (ZARA)",
        sector: "Fast Fashion",
        claim: "Working towards a sustainable circular economy",
        evidence: "Pumps out 450 million garments a year. Only 1% of recycled textiles used in new clothes.",
        deception_score: 89,
        hq_label: "Arteixo, Spain",
    },
    Company {
        id: "glencore-01",
        company: "Glencore",
        scan_label: "GLENCORE",
        sector: "Mining",
        claim: "Responsibly sourcing the commodities for everyday life",
        evidence: "Multiple bribery convictions. Massive toxic lead emissions in Peru and Zambia operations affecting children.",
        deception_score: 96,
        hq_label: "Baar, Switzerland",
    },
    Company {
        id: "vale-01",
        company: "Vale",
        scan_label: "VALE",
        sector: "Mining",
        claim: "Mining for a better future",
        evidence: "Responsible for Brumadinho dam disaster killing 270 people. Continued destruction of Brazilian savanna.",
        deception_score: 95,
        hq_label: "Rio de Janeiro, Brazil",
    },
    Company {
        id: "cargill-01",
        company: "Cargill",
        scan_label: "CARGILL",
        sector: "Agriculture",
        claim: "Helping the world thrive",
        evidence: "Largest private company driver of deforestation in Brazil. Supply chain linked to child labor in West Africa.",
        deception_score: 92,
        hq_label: "Minnetonka, MN",
    },
    Company {
        id: "jbs-01",
        company: "JBS",
        scan_label: "JBS",
        sector: "Agriculture",
        claim: "Net Zero 2040",
        evidence: "World's largest meat producer. Linked to 100k+ hectares of Amazon deforestation annually.",
        deception_score: 97,
        hq_label: "São Paulo, Brazil",
    },
    Company {
        id: "gazprom-01",
        company: "Gazprom",
        scan_label: "GAZPROM",
        sector: "Fossil Fuels",
        claim: "Reliable energy supplier",
        evidence: "Responsible for largest methane leaks recorded in history. Zero meaningful transition plan.",
        deception_score: 99,
        hq_label: "St. Petersburg, Russia",
    },
    Company {
        id: "aramco-01",
        company: "Saudi Aramco",
        scan_label: "SAUDI ARAMCO",
        sector: "Fossil Fuels",
        claim: "Lower carbon energy for the future",
        evidence: "The single largest corporate emitter in history. expanding production capacity to 13M barrels/day.",
        deception_score: 98,
        hq_label: "Dhahran, Saudi Arabia",
    },
    Company {
        id: "china-coal-01",
        company: "China Coal Energy",
        scan_label: "CHINA COAL ENERGY",
        sector: "Coal",
        claim: "Clean and efficient energy",
        evidence: "Operating massive open pit mines in Inner Mongolia destroying grasslands and water tables.",
        deception_score: 89,
        hq_label: "Beijing, China",
    },
    Company {
        id: "bayer-01",
        company: "Bayer (Monsanto)",
        scan_label: "BAYER (MONSANTO)",
        sector: "Chemicals",
        claim: "Science for a better life",
        evidence: "Production of bee-killing neonicotinoids and glyphosate. Extensive soil degradation.",
        deception_score: 91,
        hq_label: "Leverkusen, Germany",
    },
    Company {
        id: "tsmc-01",
        company: "TSMC",
        scan_label: "TSMC",
        sector: "Tech",
        claim: "Green manufacturing pioneer",
        evidence: "Consumes 5% of Taiwan's total energy and 63M tons of water annually in drought conditions.",
        deception_score: 82,
        hq_label: "Hsinchu, Taiwan",
    },
    Company {
        id: "samsung-01",
        company: "Samsung Electronics",
        scan_label: "SAMSUNG ELECTRONICS",
        sector: "Tech",
        claim: "PlanetFirst",
        evidence: "Heavily reliant on coal power in Korea and Vietnam. 80% of supply chain emissions unaddressed.",
        deception_score: 85,
        hq_label: "Suwon, South Korea",
    },
    Company {
        id: "adulterated-fuel",
        company: "Trafigura",
        scan_label: "TRAFIGURA",
        sector: "Commodities",
        claim: "Responsibly connecting markets",
        evidence: "Exported toxic 'dirty diesel' to African markets containing 200x sulfur limits causing respiratory crises.",
        deception_score: 98,
        hq_label: "Singapore",
    },
    Company {
        id: "dupont-01",
        company: "DuPont",
        scan_label: "DUPONT",
        sector: "Chemicals",
        claim: "Sustainable innovations",
        evidence: "Creator of PFAS 'forever chemicals' contaminating water for 200M+ Americans. Hid toxicity data for decades.",
        deception_score: 99,
        hq_label: "Wilmington, DE",
    },
    Company {
        id: "anglo-american",
        company: "Anglo American",
        scan_label: "ANGLO AMERICAN",
        sector: "Mining",
        claim: "Re-imagining mining to improve people's lives",
        evidence: "Lead poisoning settlement in Zambia. Coal expansion in Australia despite net-zero pledges.",
        deception_score: 90,
        hq_label: "London, UK",
    },
    Company {
        id: "pepsico-01",
        company: "PepsiCo",
        scan_label: "PEPSICO",
        sector: "Food & Beverage",
        claim: "pep+ (PepsiCo Positive)",
        evidence: "Found in top 3 plastic polluters globally for 5 years. Emissions rose 7% in 2022 despite pledges.",
        deception_score: 89,
        hq_label: "Purchase, NY",
    },
    Company {
        id: "danone-01",
        company: "Danone",
        scan_label: "DANONE",
        sector: "Food & Beverage",
        claim: "One Planet. One Health",
        evidence: "Sued by environmental groups for plastic pollution. Failing to decouple growth from virgin plastic use.",
        deception_score: 84,
        hq_label: "Paris, France",
    },
    Company {
        id: "unilever-01",
        company: "Unilever",
        scan_label: "UNILEVER",
        sector: "Consumer Goods",
        claim: "Clean Future Strategy",
        evidence: "Sachets sold in Asia flood waterways and cannot be recycled. Continued use of palm oil linked to deforestation.",
        deception_score: 87,
        hq_label: "London, UK",
    },
    Company {
        id: "tesla-01",
        company: "Tesla",
        scan_label: "TESLA",
        sector: "Automotive",
        claim: "Accelerating the world's transition to sustainable energy",
        evidence: "Ranked poorly on environmental reporting transparency. Lithium sourcing linked to water depletion in Chile.",
        deception_score: 78,
        hq_label: "Austin, TX",
    },
    Company {
        id: "h-m-01",
        company: "H&M Group",
        scan_label: "H&M GROUP",
        sector: "Fast Fashion",
        claim: "Let's close the loop",
        evidence: "96% of claims flagged as misleading by Changing Markets Foundation. Burning unsold clothes in power plants.",
        deception_score: 94,
        hq_label: "Stockholm, Sweden",
    },
    Company {
        id: "uniqlo-01",
        company: "Fast Retailing (Uniqlo)",
        scan_label: "FAST RETAILING (UNIQLO)",
        sector: "Fast Fashion",
        claim: "LifeWear: Made for All",
        evidence: "Slow to phase out coal in supply chain. Linked to forced labor allegations in Xinjiang cotton.",
        deception_score: 91,
        hq_label: "Tokyo, Japan",
    },
    Company {
        id: "marathon-01",
        company: "Marathon Petroleum",
        scan_label: "MARATHON PETROLEUM",
        sector: "Fossil Fuels",
        claim: "Challenging ourselves to lead in sustainable energy",
        evidence: "Largest refiner in US. Heavily funds trade groups fighting EV mandates and fuel efficiency standards.",
        deception_score: 96,
        hq_label: "Findlay, OH",
    },
    Company {
        id: "rio-tinto-01",
        company: "Rio Tinto",
        scan_label: "RIO TINTO",
        sector: "Mining",
        claim: "Producing materials essential to human progress",
        evidence: "Blasted 46,000-year-old Juukan Gorge rock shelters. History of toxic spills and community displacement.",
        deception_score: 97,
        hq_label: "Perth, Australia",
    },
    Company {
        id: "eni-01",
        company: "Eni",
        scan_label: "ENI",
        sector: "Fossil Fuels",
        claim: "Just Transition",
        evidence: "Advertising banned in UK for misleading claims about 'biodiesel'. Expanding oil drilling in the Arctic.",
        deception_score: 93,
        hq_label: "Rome, Italy",
    },
];

const HIGH_VALUE_TARGETS: usize = 6;

/// Labels locked on during the database step, in narrative order.
pub fn scan_labels() -> Vec<String> {
    COMPANIES
        .iter()
        .take(HIGH_VALUE_TARGETS)
        .map(|company| company.scan_label.to_string())
        .collect()
}

pub fn find(id: &str) -> Option<&'static Company> {
    COMPANIES.iter().find(|company| company.id == id)
}

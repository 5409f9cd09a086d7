//! Locality name corrections applied to published properties.
//!
//! Bucket keys and shard slugs always use the authoritative name. Only the
//! `addr_suburb` / `addr_hamlet` values written into features are corrected,
//! so that published tags match what the existing map already uses.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Locality, LocalityKind};

/// Authoritative name → name used in the existing map.
const NAME_OVERRIDES: &[(&str, &str)] = &[
    // added with the wrong spelling by earlier imports; not yet corrected
    ("Waihi Beach", "Waihī Beach"),
    ("Omihi", "Ōmihi"),
    ("Orewa", "Ōrewa"),
    // long-standing existing-map spellings
    ("Saint Heliers", "St Heliers"),
    ("St Andrews", "Saint Andrews"),
    ("Opotiki", "Ōpōtiki"),
];

/// Localities that earlier imports treated as wholly urban. Addresses here keep
/// publishing `addr_suburb` even when the authoritative kind is rural.
const LEGACY_URBAN_LOCALITIES: [&str; 215] = [
    "Kerikeri", "Mangawhai", "Akaroa", "Waipu", "Ōhaupō", "Russell", "Raglan", "Waitākere",
    "Kumeū", "Rolleston", "Helensville", "Levin", "Kaitaia", "Ōtorohanga", "Mangakino",
    "Southbridge", "Cable Bay", "Dannevirke", "Cambridge", "Manaia", "Waiotahe", "Fernside",
    "Te Puke", "Waverley", "Taupiri", "Maungaturoto", "Swanson", "Te Awamutu", "Kirwee",
    "Henderson Valley", "Leeston", "Oratia", "Palmerston", "Waimauku", "Tāneatua", "Mangōnui",
    "Morrinsville", "Eketāhuna", "Poroporo", "Matamata", "Fairlie", "Ōtāne", "Otautau",
    "Wellsford", "Springston", "Tīrau", "Ruawai", "Lincoln", "Waiuku", "Tapanui", "Lumsden",
    "Edendale", "Waipukurau", "Havelock", "Warkworth", "Ranfurly", "Brooklands", "Ōkato",
    "Coopers Beach", "Kaitangata", "Marton", "Athenree", "Waihi", "Kaikohe", "Maunu", "Taihape",
    "Wairakei", "Ruatoria", "Waiouru", "Otematata", "Pahiatua", "Waharoa", "Ashhurst", "Linton",
    "Sanson", "Tikitere", "Ngāruawāhia", "Lake Tarawera", "Algies Bay", "Tauwhare", "Tuatapere",
    "Seddon", "Waiatarua", "Drury", "Edgecumbe", "Mamaku", "Wyndham", "Roxburgh", "Pāremoremo",
    "Ōmiha", "Taipa", "Riverhead", "Waimate", "Takapau", "Waiheke Island", "Cheviot",
    "Pukekohe", "Outram", "Makauri", "Feilding", "Westmere", "Wallacetown", "Te Anau", "Winton",
    "Lawrence", "Ōtaki", "Longlands", "Kelvin Grove", "Amberley", "Omarama", "Westport",
    "Piopio", "Te Kūiti", "Kingston", "Ohai", "Pyes Pa", "Havelock North", "Murchison",
    "Wairoa", "Arrowtown", "Ruby Bay", "Owaka", "Turua", "Te Karaka", "Hāwera", "Tangimoana",
    "Foxton", "Huia", "Kainga", "Nightcaps", "Ruakākā", "Kurow", "Prebbleton", "Tuakau",
    "Spring Creek", "Ōpunake", "Te Awanga", "Waikino", "Martinborough", "Lucas Heights",
    "Ōhura", "Mangapai", "Pirongia", "Hampden", "Te Ore Ore", "Ōpaheke", "Wānaka",
    "Kaikoura Flat", "Huntly", "Lake Ōkareka", "Oxford", "Shannon", "Kaiata", "Grovetown",
    "Otaika", "Waitoa", "Brightwater", "Kawakawa", "Waipawa", "Waiau", "Putāruru", "Inglewood",
    "Okoia", "Ōkura", "Burnham", "Waikari", "Tākaka", "Normanby", "Te Aroha", "Ahipara",
    "Pareora", "Blackball", "Lorneville", "Spencerville", "Rotokauri", "Woodend", "Darfield",
    "Methven", "Hope", "Tinwald", "Carters Beach", "Waitārere", "Hikurangi", "Eltham",
    "Pātūtahi", "Clinton", "Redvale", "Temuka", "Paeroa", "Motueka", "Kaniere", "Taumarunui",
    "Doyleston", "The Pines Beach", "Appleby", "Haumoana", "Winchester", "Dobson",
    "Temple View", "Ohariu", "Marsden", "Ross", "Mosgiel", "Massey", "Woodville", "Bulls",
    "Tokoroa", "Thames", "Kihikihi", "Alexandra", "Renwick", "Weston", "Woodbourne", "Manunui",
    "Mākara",
];

/// Resolves the published tag for a locality.
#[derive(Debug, Clone)]
pub struct LocalityNaming {
    overrides: BTreeMap<String, String>,
    legacy_urban: BTreeSet<String>,
}

impl LocalityNaming {
    /// Naming with no corrections at all.
    pub fn identity() -> Self {
        Self {
            overrides: BTreeMap::new(),
            legacy_urban: BTreeSet::new(),
        }
    }

    /// Add or replace a name override.
    pub fn with_override(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.overrides.insert(from.into(), to.into());
        self
    }

    /// Mark a locality as legacy urban.
    pub fn with_legacy_urban(mut self, name: impl Into<String>) -> Self {
        self.legacy_urban.insert(name.into());
        self
    }

    /// The name written into published properties.
    pub fn published_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.overrides.get(name).map(String::as_str).unwrap_or(name)
    }

    /// The kind used when publishing; legacy-urban localities are always urban.
    pub fn published_kind(&self, locality: &Locality) -> LocalityKind {
        if locality.kind == LocalityKind::Rural && self.legacy_urban.contains(&locality.name) {
            LocalityKind::Urban
        } else {
            locality.kind
        }
    }
}

impl Default for LocalityNaming {
    fn default() -> Self {
        Self {
            overrides: NAME_OVERRIDES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            legacy_urban: LEGACY_URBAN_LOCALITIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

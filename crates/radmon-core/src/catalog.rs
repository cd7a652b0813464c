//! Reference data: monitoring stations and the regions that group them.
//!
//! The built-in catalog describes the national radiation-monitoring network as a
//! compile-time table and is materialized once per process by [`Catalog::builtin`].
//! Station names are the join key against parsed readings and are kept exactly as
//! the feed spells them (no case folding, no diacritic stripping).
//!
//! Custom catalogs can be assembled with [`Catalog::builder`], which validates
//! names and coordinates.
//!
//! ```rust
//! use radmon_core::catalog::{Catalog, RegionId};
//!
//! let catalog = Catalog::builtin();
//! let gomel = catalog.region_by_id(RegionId::Gomel).unwrap();
//! assert_eq!(gomel.stations()[0].name(), "Брагин");
//! assert!(catalog.station("Мозырь").is_some());
//! ```

use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// A fixed radiation-monitoring point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    name: String,
    latitude: f64,
    longitude: f64,
    region: String,
}

impl Station {
    /// Station name, unique within a catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude in decimal degrees.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Name of the region this station belongs to.
    pub fn region(&self) -> &str {
        &self.region
    }
}

/// An administrative grouping of stations, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    name: String,
    stations: Vec<Station>,
}

impl Region {
    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member stations in catalog declaration order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Exact-name membership test.
    pub fn contains(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s.name == station)
    }
}

/// Selector for the regions of the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionId {
    /// Брестская область
    Brest,
    /// Витебская область
    Vitebsk,
    /// Гомельская область
    Gomel,
    /// Гродненская область
    Grodno,
    /// Минская область (including the city of Minsk)
    Minsk,
    /// Могилёвская область
    Mogilev,
}

impl RegionId {
    /// Every region, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Brest,
        Self::Vitebsk,
        Self::Gomel,
        Self::Grodno,
        Self::Minsk,
        Self::Mogilev,
    ];

    /// Region name as it appears in the catalog.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Brest => "Брестская область",
            Self::Vitebsk => "Витебская область",
            Self::Gomel => "Гомельская область",
            Self::Grodno => "Гродненская область",
            Self::Minsk => "Минская область",
            Self::Mogilev => "Могилёвская область",
        }
    }

    /// Stable ASCII identifier.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Brest => "brest",
            Self::Vitebsk => "vitebsk",
            Self::Gomel => "gomel",
            Self::Grodno => "grodno",
            Self::Minsk => "minsk",
            Self::Mogilev => "mogilev",
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RegionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.slug().eq_ignore_ascii_case(trimmed) || id.name() == trimmed)
            .ok_or_else(|| Error::NotFound(format!("Unknown region '{trimmed}'")))
    }
}

type StationRow = (&'static str, f64, f64);

/// Built-in network: (region, [(station, latitude, longitude)]).
const NETWORK: &[(RegionId, &[StationRow])] = &[
    (
        RegionId::Brest,
        &[
            ("Брест", 52.0976, 23.7341),
            ("Высокое", 52.3667, 23.3833),
            ("Пружаны", 52.5560, 24.4573),
            ("Ивацевичи", 52.7094, 25.3400),
            ("Барановичи", 53.1327, 26.0139),
            ("Ганцевичи", 52.7566, 26.4314),
            ("Пинск", 52.1115, 26.1031),
        ],
    ),
    (
        RegionId::Vitebsk,
        &[
            ("Витебск", 55.1904, 30.2049),
            ("Полоцк", 55.4879, 28.7856),
            ("Верхнедвинск", 55.7777, 27.9389),
            ("Шарковщина", 55.3667, 27.4667),
            ("Лынтупы", 55.0500, 26.3167),
            ("Докшицы", 54.8931, 27.7675),
            ("Лепель", 54.8814, 28.6990),
            ("Езерище", 55.8333, 30.0000),
            ("Сенно", 54.8125, 29.7083),
            ("Орша", 54.5153, 30.4053),
        ],
    ),
    (
        RegionId::Gomel,
        &[
            ("Брагин", 51.7833, 30.2667),
            ("Наровля", 51.8000, 29.5000),
            ("Мозырь", 52.0495, 29.2456),
            ("Лельчицы", 51.7894, 28.3306),
            ("Житковичи", 52.2333, 27.8500),
            ("Василевичи", 52.2500, 29.8333),
            ("Октябрь", 52.6500, 28.8833),
            ("Жлобин", 52.8926, 30.0240),
            ("Гомель", 52.4345, 30.9754),
            ("Чечерск", 52.9167, 30.9167),
        ],
    ),
    (
        RegionId::Grodno,
        &[
            ("Гродно", 53.6884, 23.8258),
            ("Волковыск", 53.1561, 24.4513),
            ("Лида", 53.8885, 25.2846),
            ("Новогрудок", 53.5942, 25.8191),
            ("Ошмяны", 54.4247, 25.9361),
        ],
    ),
    (
        RegionId::Minsk,
        &[
            ("Минск", 53.9045, 27.5615),
            ("Вилейка", 54.4914, 26.9111),
            ("Нарочь, оз.", 54.9000, 26.7167),
            ("Борисов", 54.2279, 28.5050),
            ("Березинский заповедник", 54.7333, 28.3167),
            ("Марьина Горка", 53.5075, 28.1472),
            ("Слуцк", 53.0274, 27.5597),
        ],
    ),
    (
        RegionId::Mogilev,
        &[
            ("Могилёв", 53.9007, 30.3314),
            ("Горки", 54.2862, 30.9842),
            ("Мстиславль", 54.0186, 31.7217),
            ("Костюковичи", 53.3536, 32.0508),
            ("Славгород", 53.4447, 31.0017),
            ("Кличев", 53.4924, 29.3385),
            ("Бобруйск", 53.1384, 29.2214),
        ],
    ),
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    let regions = NETWORK
        .iter()
        .map(|(id, rows)| Region {
            name: id.name().to_string(),
            stations: rows
                .iter()
                .map(|&(name, latitude, longitude)| Station {
                    name: name.to_string(),
                    latitude,
                    longitude,
                    region: id.name().to_string(),
                })
                .collect(),
        })
        .collect();
    Catalog { regions }
});

/// Immutable set of regions and their stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    regions: Vec<Region>,
}

impl Catalog {
    /// The built-in national network, constructed on first use.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Start assembling a custom catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Regions in declaration order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Look up a region by exact name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Look up one of the built-in regions by selector.
    pub fn region_by_id(&self, id: RegionId) -> Option<&Region> {
        self.region(id.name())
    }

    /// Every station across all regions, in declaration order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.regions.iter().flat_map(|r| r.stations.iter())
    }

    /// Look up a station by exact name.
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations().find(|s| s.name == name)
    }

    /// Whether `name` is a station of this catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.station(name).is_some()
    }

    /// Total number of stations.
    pub fn len(&self) -> usize {
        self.regions.iter().map(|r| r.stations.len()).sum()
    }

    /// Whether the catalog has no station at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validating builder for [`Catalog`].
///
/// Stations are attached to the most recently declared region.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    regions: Vec<Region>,
    error: Option<Error>,
}

impl CatalogBuilder {
    /// Open a new region; subsequent stations belong to it.
    #[must_use]
    pub fn region(mut self, name: impl Into<String>) -> Self {
        self.regions.push(Region {
            name: name.into(),
            stations: Vec::new(),
        });
        self
    }

    /// Add a station to the current region.
    #[must_use]
    pub fn station(mut self, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        let name = name.into();
        match self.regions.last_mut() {
            Some(region) => region.stations.push(Station {
                name,
                latitude,
                longitude,
                region: region.name.clone(),
            }),
            None => {
                self.error.get_or_insert_with(|| {
                    Error::Config(format!("Station '{name}' declared before any region"))
                });
            },
        }
        self
    }

    /// Validate and produce the catalog.
    ///
    /// Rejects duplicate region or station names, blank names, and coordinates
    /// that are not finite or out of range.
    pub fn build(self) -> Result<Catalog> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut region_names = HashSet::new();
        let mut station_names = HashSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() {
                return Err(Error::Config("Region name must not be blank".into()));
            }
            if !region_names.insert(region.name.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate region '{}'",
                    region.name
                )));
            }
            for station in &region.stations {
                if station.name.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "Blank station name in region '{}'",
                        region.name
                    )));
                }
                if !station_names.insert(station.name.as_str()) {
                    return Err(Error::Config(format!(
                        "Duplicate station '{}'",
                        station.name
                    )));
                }
                if !valid_coordinates(station.latitude, station.longitude) {
                    return Err(Error::Config(format!(
                        "Station '{}' has invalid coordinates ({}, {})",
                        station.name, station.latitude, station.longitude
                    )));
                }
            }
        }

        Ok(Catalog {
            regions: self.regions,
        })
    }
}

pub(crate) fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite() && longitude.is_finite() && (-90.0..=90.0).contains(&latitude)
}

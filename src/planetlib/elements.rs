//! Keplerian elements for the major planets
//!
//! Mean elements and their rates per Julian century from E.M. Standish,
//! "Keplerian Elements for Approximate Positions of the Major Planets"
//! (JPL), valid 1800 AD to 2050 AD, referred to the mean ecliptic and
//! equinox of J2000. Outside that interval the positions degrade smoothly.

use super::kepler::{orbit_to_reference, orbital_plane_position, solve_kepler};
use super::{Body, PlanetError};
use crate::coordinates::{Angle, HelioEcliptic};
use crate::time::Instant;

/// One element set: value at J2000 and rate per Julian century
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRate {
    pub value: f64,
    pub rate: f64,
}

impl ElementRate {
    const fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    /// Element value after `t` Julian centuries
    pub fn at(&self, t: f64) -> f64 {
        self.value + self.rate * t
    }
}

/// Mean orbital elements with linear secular rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis, AU
    pub semi_major_axis: ElementRate,
    pub eccentricity: ElementRate,
    /// Inclination, degrees
    pub inclination: ElementRate,
    /// Mean longitude, degrees
    pub mean_longitude: ElementRate,
    /// Longitude of perihelion, degrees
    pub perihelion_longitude: ElementRate,
    /// Longitude of the ascending node, degrees
    pub ascending_node: ElementRate,
}

/// Elements evaluated at one instant, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OsculatingElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node: f64,
    pub argument_of_perihelion: f64,
    /// Mean anomaly wrapped to (-180°, 180°]
    pub mean_anomaly: f64,
}

macro_rules! elements {
    ($a:expr, $e:expr, $i:expr, $l:expr, $w:expr, $n:expr) => {
        OrbitalElements {
            semi_major_axis: ElementRate::new($a.0, $a.1),
            eccentricity: ElementRate::new($e.0, $e.1),
            inclination: ElementRate::new($i.0, $i.1),
            mean_longitude: ElementRate::new($l.0, $l.1),
            perihelion_longitude: ElementRate::new($w.0, $w.1),
            ascending_node: ElementRate::new($n.0, $n.1),
        }
    };
}

pub const MERCURY: OrbitalElements = elements!(
    (0.387_099_27, 0.000_000_37),
    (0.205_635_93, 0.000_019_06),
    (7.004_979_02, -0.005_947_49),
    (252.250_323_50, 149_472.674_111_75),
    (77.457_796_28, 0.160_476_89),
    (48.330_765_93, -0.125_340_81)
);

pub const VENUS: OrbitalElements = elements!(
    (0.723_335_66, 0.000_003_90),
    (0.006_776_72, -0.000_041_07),
    (3.394_676_05, -0.000_788_90),
    (181.979_099_50, 58_517.815_387_29),
    (131.602_467_18, 0.002_683_29),
    (76.679_842_55, -0.277_694_18)
);

/// Earth-Moon barycentre, used for the Earth
pub const EARTH: OrbitalElements = elements!(
    (1.000_002_61, 0.000_005_62),
    (0.016_711_23, -0.000_043_92),
    (-0.000_015_31, -0.012_946_68),
    (100.464_571_66, 35_999.372_449_81),
    (102.937_681_93, 0.323_273_64),
    (0.0, 0.0)
);

pub const MARS: OrbitalElements = elements!(
    (1.523_710_34, 0.000_018_47),
    (0.093_394_10, 0.000_078_82),
    (1.849_691_42, -0.008_131_31),
    (-4.553_432_05, 19_140.302_684_99),
    (-23.943_629_59, 0.444_410_88),
    (49.559_538_91, -0.292_573_43)
);

pub const JUPITER: OrbitalElements = elements!(
    (5.202_887_00, -0.000_116_07),
    (0.048_386_24, -0.000_132_53),
    (1.304_396_95, -0.001_837_14),
    (34.396_440_51, 3_034.746_127_75),
    (14.728_479_83, 0.212_526_68),
    (100.473_909_09, 0.204_691_06)
);

pub const SATURN: OrbitalElements = elements!(
    (9.536_675_94, -0.001_250_60),
    (0.053_861_79, -0.000_509_91),
    (2.485_991_87, 0.001_936_09),
    (49.954_244_23, 1_222.493_622_01),
    (92.598_878_31, -0.418_972_16),
    (113.662_424_48, -0.288_677_94)
);

pub const URANUS: OrbitalElements = elements!(
    (19.189_164_64, -0.001_961_76),
    (0.047_257_44, -0.000_043_97),
    (0.772_637_83, -0.002_429_39),
    (313.238_104_51, 428.482_027_85),
    (170.954_276_30, 0.408_052_81),
    (74.016_925_03, 0.042_405_89)
);

pub const NEPTUNE: OrbitalElements = elements!(
    (30.069_922_76, 0.000_262_91),
    (0.008_590_48, 0.000_051_05),
    (1.770_043_47, 0.000_353_72),
    (-55.120_029_69, 218.459_453_25),
    (44.964_762_27, -0.322_414_64),
    (131.784_225_74, -0.005_086_64)
);

pub const PLUTO: OrbitalElements = elements!(
    (39.482_116_75, -0.000_315_96),
    (0.248_827_30, 0.000_051_70),
    (17.140_012_06, 0.000_048_18),
    (238.929_038_33, 145.207_805_15),
    (224.068_916_29, -0.040_629_42),
    (110.303_936_84, -0.011_834_82)
);

impl OrbitalElements {
    /// Look up the element set of a body that orbits the Sun
    pub fn for_body(body: Body) -> Result<&'static OrbitalElements, PlanetError> {
        match body {
            Body::Mercury => Ok(&MERCURY),
            Body::Venus => Ok(&VENUS),
            Body::Earth => Ok(&EARTH),
            Body::Mars => Ok(&MARS),
            Body::Jupiter => Ok(&JUPITER),
            Body::Saturn => Ok(&SATURN),
            Body::Uranus => Ok(&URANUS),
            Body::Neptune => Ok(&NEPTUNE),
            Body::Pluto => Ok(&PLUTO),
            Body::Sun | Body::Moon => Err(PlanetError::NoElements(body)),
        }
    }

    /// Evaluate the elements at an instant
    pub fn at(&self, instant: Instant) -> OsculatingElements {
        let t = instant.centuries_since_j2000();
        let mean_longitude = self.mean_longitude.at(t);
        let perihelion = self.perihelion_longitude.at(t);
        let node = self.ascending_node.at(t);

        OsculatingElements {
            semi_major_axis: self.semi_major_axis.at(t),
            eccentricity: self.eccentricity.at(t),
            inclination: self.inclination.at(t),
            ascending_node: node,
            argument_of_perihelion: perihelion - node,
            mean_anomaly: Angle::from_degrees(mean_longitude - perihelion)
                .normalized_signed()
                .to_degrees(),
        }
    }

    /// Heliocentric position in the J2000 ecliptic frame
    pub fn position(&self, instant: Instant) -> Result<HelioEcliptic, PlanetError> {
        let el = self.at(instant);
        let eccentric_anomaly = solve_kepler(el.mean_anomaly.to_radians(), el.eccentricity)?;
        let in_plane = orbital_plane_position(el.semi_major_axis, el.eccentricity, eccentric_anomaly);
        let rotation = orbit_to_reference(
            el.ascending_node.to_radians(),
            el.inclination.to_radians(),
            el.argument_of_perihelion.to_radians(),
        );
        Ok(HelioEcliptic::from_vector(rotation * in_plane))
    }
}

/// Heliocentric ecliptic position of a planet (or the Earth)
pub fn heliocentric_position(body: Body, instant: Instant) -> Result<HelioEcliptic, PlanetError> {
    OrbitalElements::for_body(body)?.position(instant)
}

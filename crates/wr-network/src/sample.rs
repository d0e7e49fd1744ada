//! A small realistic city used by the demo and the tests.
//!
//! Ten locations, seven streets of all three kinds and two closures:
//!
//! | Street           | Kind                         | Closed   |
//! |------------------|------------------------------|----------|
//! | Avenue Principale| two-way, multi-lane          |          |
//! | Boulevard Nord   | two-way, multi-lane          | 08h–10h  |
//! | Rue Montmartre   | one-way République → Opéra   | 07h–09h  |
//! | Rue Saint Michel | one-way Liberté → Luxembourg |          |
//! | Rue Lafayette    | two-way, single lane         |          |
//! | Rue Transversale | two-way, single lane         |          |
//! | Rue Soufflot     | two-way, single lane         |          |
//!
//! Rue Soufflot is the way out of Carrefour Luxembourg, which the one-way
//! Rue Saint Michel only leads into.

use wr_core::CityRng;

use crate::{City, NetworkResult, OrientationHypothesis, StreetOrientation};

const COORDINATES: [(&str, f64, f64); 10] = [
    ("Entrepot Base",         0.0, 500.0),
    ("Carrefour République",  200.0, 500.0),
    ("Maison Belle Vue",      300.0, 500.0),
    ("Carrefour Liberté",     500.0, 500.0),
    ("Carrefour Nation",      800.0, 500.0),
    ("Maison Tour Eiffel",    200.0, 350.0),
    ("Carrefour Opéra",       200.0, 200.0),
    ("Immeuble Grand Palais", 400.0, 200.0),
    ("Maison Panthéon",       500.0, 650.0),
    ("Carrefour Luxembourg",  500.0, 800.0),
];

const SEGMENTS: [(&str, &str, &str, f64); 13] = [
    ("Avenue Principale", "Entrepot Base",         "Carrefour République",  2.5),
    ("Avenue Principale", "Carrefour République",  "Maison Belle Vue",      1.8),
    ("Avenue Principale", "Maison Belle Vue",      "Carrefour Liberté",     2.2),
    ("Avenue Principale", "Carrefour Liberté",     "Carrefour Nation",      3.0),
    ("Boulevard Nord",    "Carrefour Opéra",       "Immeuble Grand Palais", 2.0),
    ("Boulevard Nord",    "Immeuble Grand Palais", "Carrefour Liberté",     2.5),
    ("Rue Montmartre",    "Carrefour République",  "Maison Tour Eiffel",    1.5),
    ("Rue Montmartre",    "Maison Tour Eiffel",    "Carrefour Opéra",       1.8),
    ("Rue Saint Michel",  "Carrefour Liberté",     "Maison Panthéon",       1.6),
    ("Rue Saint Michel",  "Maison Panthéon",       "Carrefour Luxembourg",  1.9),
    ("Rue Lafayette",     "Carrefour Liberté",     "Carrefour Opéra",       2.8),
    ("Rue Transversale",  "Carrefour République",  "Carrefour Opéra",       2.0),
    ("Rue Soufflot",      "Carrefour Luxembourg",  "Carrefour Nation",      3.2),
];

/// Build the sample city under `hypothesis`.  Departure stays at 08h and no
/// incidents are drawn.
pub fn sample_city(hypothesis: OrientationHypothesis, rng: CityRng) -> NetworkResult<City> {
    let mut city = City::new(hypothesis, rng);

    for (name, x, y) in COORDINATES {
        city.set_coordinates(name, x, y)?;
    }

    city.configure_street("Avenue Principale", StreetOrientation::TwoWayMultiLane { lanes: 2 });
    city.configure_street("Boulevard Nord", StreetOrientation::TwoWayMultiLane { lanes: 2 });
    city.configure_one_way(
        "Rue Montmartre",
        &["Carrefour République", "Maison Tour Eiffel", "Carrefour Opéra"],
    )?;
    city.configure_one_way(
        "Rue Saint Michel",
        &["Carrefour Liberté", "Maison Panthéon", "Carrefour Luxembourg"],
    )?;
    city.configure_street("Rue Lafayette", StreetOrientation::TwoWaySingleLane);
    city.configure_street("Rue Transversale", StreetOrientation::TwoWaySingleLane);
    city.configure_street("Rue Soufflot", StreetOrientation::TwoWaySingleLane);

    for (street, from, to, minutes) in SEGMENTS {
        city.add_segment(street, from, to, minutes)?;
    }

    city.add_closure("Rue Montmartre", 7, 9)?;
    city.add_closure("Boulevard Nord", 8, 10)?;

    Ok(city)
}

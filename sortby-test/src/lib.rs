//! Shared fixtures for the end-to-end tests of `sortby`.
//!
//! The same small dataset is exposed as typed [`Person`] records and as raw JSON objects so that
//! every ordering can be checked against both record representations, and [`random_people`]
//! generates larger seeded datasets with duplicate keys, missing scores and NaN scores.

use rand::Rng;
use serde::Deserialize;
use sortby::impl_record;

const PEOPLE: &str = include_str!("../resources/people.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub score: Option<f64>,
}

impl_record!(Person { name, age, score });

impl Person {
    pub fn new(name: &str, age: u32, score: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            age,
            score,
        }
    }
}

/// Bob (23), Alice (23), Chloe (42), Bob (21), in this order.
pub fn people() -> Vec<Person> {
    serde_json::from_str(PEOPLE).expect("fixture should be valid")
}

pub fn people_json() -> Vec<serde_json::Value> {
    serde_json::from_str(PEOPLE).expect("fixture should be valid")
}

/// Picks `data[i]` for every index, mirroring how expected orderings are written down.
pub fn pick<T: Clone>(data: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| data[i].clone()).collect()
}

const NAMES: &[&str] = &["Alice", "Bob", "Chloe", "Dave", "Eve"];

/// Builds `len` random people.
///
/// Names and ages come from small pools so duplicates are common. About one in eight scores is
/// missing and one in eight is NaN.
pub fn random_people(len: usize, rng: &mut impl Rng) -> Vec<Person> {
    (0..len)
        .map(|_| {
            let name = NAMES[rng.random_range(0..NAMES.len())];
            let age = rng.random_range(18..26);
            let score = match rng.random_range(0..8u32) {
                0 => None,
                1 => Some(f64::NAN),
                n => Some(f64::from(n) / 2.0),
            };
            Person::new(name, age, score)
        })
        .collect()
}

/// Renders records for order comparisons; unlike `==`, this treats NaN scores as equal.
pub fn render(people: &[Person]) -> Vec<String> {
    people.iter().map(|p| format!("{p:?}")).collect()
}

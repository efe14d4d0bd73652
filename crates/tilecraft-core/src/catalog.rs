//! Piece templates and the seeded shop roller.
//!
//! A [`Catalog`] lists what can be spawned; a [`ShopRoller`] draws weighted
//! offers from it. The roller uses `ChaCha8Rng`, so the same seed always
//! yields the same offers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tessel::{MaskError, Rotation, ShapeMask};

/// Named shapes shared by the building and shop catalogs.
pub const STANDARD_SHAPES: [(&str, &str); 8] = [
    ("single", "#"),
    ("domino", "##"),
    ("line3", "###"),
    ("corner", "#.\n##"),
    ("square", "##\n##"),
    ("tee", "###\n.#."),
    ("ell", "#.\n#.\n##"),
    ("ess", ".##\n##."),
];

/// Parse [`STANDARD_SHAPES`].
///
/// # Errors
///
/// Returns a [`MaskError`] if a pattern is malformed.
pub fn standard_shapes() -> Result<Vec<(&'static str, ShapeMask)>, MaskError> {
    STANDARD_SHAPES
        .iter()
        .map(|&(name, pattern)| Ok((name, ShapeMask::parse(pattern)?)))
        .collect()
}

/// A spawnable piece definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceTemplate<A> {
    /// Display name
    pub name: String,
    /// Unrotated footprint
    pub mask: ShapeMask,
    /// Payload copied into each spawned piece
    pub attributes: A,
    /// Relative roll weight; zero never rolls
    pub weight: u32,
}

impl<A> PieceTemplate<A> {
    /// Create a template with weight 1.
    #[must_use]
    pub fn new(name: impl Into<String>, mask: ShapeMask, attributes: A) -> Self {
        Self {
            name: name.into(),
            mask,
            attributes,
            weight: 1,
        }
    }

    /// Set the roll weight (builder pattern).
    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

/// An ordered list of templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog<A> {
    templates: Vec<PieceTemplate<A>>,
}

impl<A> Default for Catalog<A> {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
        }
    }
}

impl<A> Catalog<A> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a template.
    pub fn add(&mut self, template: PieceTemplate<A>) {
        self.templates.push(template);
    }

    /// Append a template (builder pattern).
    #[must_use]
    pub fn with(mut self, template: PieceTemplate<A>) -> Self {
        self.add(template);
        self
    }

    /// Look up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PieceTemplate<A>> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// All templates in insertion order.
    #[must_use]
    pub fn templates(&self) -> &[PieceTemplate<A>] {
        &self.templates
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True if the catalog has no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.templates.iter().map(|t| u64::from(t.weight)).sum()
    }
}

/// Deterministic weighted roller for shop offers.
#[derive(Debug, Clone)]
pub struct ShopRoller {
    rng: ChaCha8Rng,
    seed: u64,
}

impl ShopRoller {
    /// Create a roller from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this roller was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw one template, weighted. `None` if every weight is zero.
    pub fn roll<'c, A>(&mut self, catalog: &'c Catalog<A>) -> Option<&'c PieceTemplate<A>> {
        let total = catalog.total_weight();
        if total == 0 {
            return None;
        }
        let mut pick = self.rng.gen_range(0..total);
        for template in catalog.templates() {
            let weight = u64::from(template.weight);
            if pick < weight {
                return Some(template);
            }
            pick -= weight;
        }
        None
    }

    /// Draw `count` templates (with replacement).
    pub fn roll_offer<'c, A>(
        &mut self,
        catalog: &'c Catalog<A>,
        count: usize,
    ) -> Vec<&'c PieceTemplate<A>> {
        (0..count).filter_map(|_| self.roll(catalog)).collect()
    }

    /// Draw a uniformly random rotation.
    pub fn roll_rotation(&mut self) -> Rotation {
        Rotation::ALL[self.rng.gen_range(0..Rotation::ALL.len())]
    }
}

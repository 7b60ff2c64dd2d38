//! Seed data for the built-in venues.

use showtimes_core::theater::{Coordinates, NewTheater, VenueId};

use crate::registry::Venue;

pub(crate) struct Seed {
  pub slug:        &'static str,
  pub name:        &'static str,
  pub street:      &'static str,
  pub city:        &'static str,
  pub zip:         &'static str,
  pub website:     &'static str,
  pub coordinates: Option<(f64, f64)>,
}

impl Seed {
  pub fn id(&self) -> VenueId { VenueId::from(self.slug) }

  pub fn venue(&self) -> Venue {
    Venue {
      id:      self.id(),
      theater: NewTheater {
        name:        self.name.to_owned(),
        address:     Some(self.street.to_owned()),
        city:        Some(self.city.to_owned()),
        state:       Some("CA".to_owned()),
        zip:         Some(self.zip.to_owned()),
        coordinates: self
          .coordinates
          .map(|(latitude, longitude)| Coordinates { latitude, longitude }),
        website:     Some(self.website.to_owned()),
      },
    }
  }
}

// ─── New Beverly ─────────────────────────────────────────────────────────────

pub(crate) const NEW_BEVERLY_BASE: &str = "https://thenewbev.com";
pub(crate) const NEW_BEVERLY_SCHEDULE: &str = "https://thenewbev.com/schedule/";

pub(crate) const NEW_BEVERLY: Seed = Seed {
  slug:        "new-beverly",
  name:        "New Beverly Cinema",
  street:      "7165 Beverly Blvd",
  city:        "Los Angeles",
  zip:         "90036",
  website:     "https://thenewbev.com",
  coordinates: Some((34.0759, -118.3432)),
};

// ─── Laemmle ─────────────────────────────────────────────────────────────────

pub(crate) const LAEMMLE_BASE: &str = "https://www.laemmle.com";

/// Laemmle venues; `website` doubles as the per-day schedule page.
pub(crate) const LAEMMLE: &[Seed] = &[
  Seed {
    slug:        "laemmle-royal",
    name:        "Laemmle Royal",
    street:      "11523 Santa Monica Blvd",
    city:        "Los Angeles",
    zip:         "90025",
    website:     "https://www.laemmle.com/theater/royal",
    coordinates: None,
  },
  Seed {
    slug:        "laemmle-town-center-5",
    name:        "Laemmle Town Center 5",
    street:      "17200 Ventura Blvd",
    city:        "Encino",
    zip:         "91316",
    website:     "https://www.laemmle.com/theater/town-center-5",
    coordinates: None,
  },
  Seed {
    slug:        "laemmle-glendale",
    name:        "Laemmle Glendale",
    street:      "207 N Maryland Ave",
    city:        "Glendale",
    zip:         "91206",
    website:     "https://www.laemmle.com/theater/glendale",
    coordinates: None,
  },
  Seed {
    slug:        "laemmle-monica-film-center",
    name:        "Laemmle Monica Film Center",
    street:      "1332 2nd St",
    city:        "Santa Monica",
    zip:         "90401",
    website:     "https://www.laemmle.com/theater/monica-film-center",
    coordinates: None,
  },
  Seed {
    slug:        "laemmle-newhall",
    name:        "Laemmle Newhall",
    street:      "24201 Valencia Blvd #1701",
    city:        "Santa Clarita",
    zip:         "91355",
    website:     "https://www.laemmle.com/theater/newhall",
    coordinates: None,
  },
  Seed {
    slug:        "laemmle-noho-7",
    name:        "Laemmle NoHo 7",
    street:      "5240 Lankershim Blvd",
    city:        "North Hollywood",
    zip:         "91601",
    website:     "https://www.laemmle.com/theater/noho-7",
    coordinates: None,
  },
  Seed {
    slug:        "laemmle-claremont-5",
    name:        "Laemmle Claremont 5",
    street:      "450 W 2nd St",
    city:        "Claremont",
    zip:         "91711",
    website:     "https://www.laemmle.com/theater/claremont-5",
    coordinates: None,
  },
  Seed {
    slug:        "laemmle-playhouse-7",
    name:        "Laemmle Playhouse 7",
    street:      "673 E Colorado Blvd",
    city:        "Pasadena",
    zip:         "91101",
    website:     "https://www.laemmle.com/theater/playhouse-7",
    coordinates: None,
  },
];

// ─── American Cinematheque ───────────────────────────────────────────────────

pub(crate) const CINEMATHEQUE_API: &str =
  "https://www.americancinematheque.com/wp-json/wp/v2/algolia_get_events";

/// Feed location id and venue.
pub(crate) const CINEMATHEQUE: &[(i64, Seed)] = &[
  (54, Seed {
    slug:        "ac-aero",
    name:        "American Cinematheque - Aero Theatre",
    street:      "1328 Montana Ave",
    city:        "Santa Monica",
    zip:         "90403",
    website:     "https://www.americancinematheque.com",
    coordinates: None,
  }),
  (55, Seed {
    slug:        "ac-egyptian",
    name:        "American Cinematheque - Egyptian Theatre",
    street:      "6712 Hollywood Blvd",
    city:        "Los Angeles",
    zip:         "90028",
    website:     "https://www.americancinematheque.com",
    coordinates: None,
  }),
  (102, Seed {
    slug:        "ac-los-feliz-3",
    name:        "American Cinematheque - Los Feliz 3",
    street:      "1822 N Vermont Ave",
    city:        "Los Angeles",
    zip:         "90027",
    website:     "https://www.americancinematheque.com",
    coordinates: None,
  }),
];

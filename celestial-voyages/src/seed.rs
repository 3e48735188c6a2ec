//! Sample catalogue loaded at startup.

use crate::model::{
    DestinationType, NewAccommodation, NewDestination, NewExperience, NewTravelClass,
};
use crate::store::MemStore;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| String::from(*item)).collect()
}

pub fn seed_catalog(store: &mut MemStore) {
    let iss = store.create_destination(NewDestination {
        name: String::from("International Space Station"),
        description: String::from(
            "Experience zero gravity and witness 16 sunrises daily as you orbit Earth aboard humanity's outpost in space.",
        ),
        kind: DestinationType::Orbital,
        image_url: String::from("https://images.unsplash.com/photo-1446776811953-b23d57bd21aa?auto=format&fit=crop&w=600&q=80"),
        distance: 420,
        duration: 10,
        base_price: 58_000,
    });
    let moon = store.create_destination(NewDestination {
        name: String::from("Lunar Expedition"),
        description: String::from(
            "Walk in the footsteps of the Apollo astronauts and experience lunar gravity in our state-of-the-art habitats.",
        ),
        kind: DestinationType::Lunar,
        image_url: String::from("https://images.unsplash.com/photo-1514944227608-39256be4ca10?auto=format&fit=crop&w=600&q=80"),
        distance: 384_400,
        duration: 14,
        base_price: 125_000,
    });
    let mars = store.create_destination(NewDestination {
        name: String::from("Mars Colony Tour"),
        description: String::from(
            "Pioneer the Red Planet experience with exclusive access to the first human settlements on another world.",
        ),
        kind: DestinationType::Planetary,
        image_url: String::from("https://images.unsplash.com/photo-1575470522418-b88b692b8b9b?auto=format&fit=crop&w=600&q=80"),
        distance: 225_000_000,
        duration: 180,
        base_price: 350_000,
    });

    store.create_travel_class(NewTravelClass {
        name: String::from("Cosmonaut Class"),
        description: String::from(
            "Our essential space experience with all the necessities for a comfortable journey beyond Earth.",
        ),
        price_multiplier: 100,
        features: strings(&[
            "Standard cabin accommodations",
            "Basic space food package",
            "Guided tours and activities",
            "Safety and survival training",
        ]),
    });
    store.create_travel_class(NewTravelClass {
        name: String::from("Astronaut Class"),
        description: String::from(
            "Enhanced comfort with additional perks for a more personalized space adventure.",
        ),
        price_multiplier: 150,
        features: strings(&[
            "Premium cabin with window views",
            "Gourmet space cuisine options",
            "Priority scheduling for activities",
            "Exclusive EVA experience (spacewalk)",
            "Advanced space photography kit",
        ]),
    });
    store.create_travel_class(NewTravelClass {
        name: String::from("Pioneer Class"),
        description: String::from(
            "The ultimate luxury space experience with exclusive amenities and personalized service.",
        ),
        price_multiplier: 250,
        features: strings(&[
            "Luxury suite with panoramic views",
            "Private chef and custom menu",
            "Private space exploration missions",
            "Extended EVA sessions with 3D recording",
            "Dedicated space concierge service",
            "Post-flight VIP recovery program",
        ]),
    });

    store.create_accommodation(NewAccommodation {
        name: String::from("Aurora Orbital Hotel"),
        description: String::from(
            "Luxury accommodation in Earth's orbit with panoramic views of our planet and the endless cosmos.",
        ),
        destination_id: iss.id,
        image_url: String::from("https://images.unsplash.com/photo-1517394834181-95ed159986c7?auto=format&fit=crop&w=600&q=80"),
        capacity: 36,
        size: 400,
        price_per_night: 12_500,
        amenities: strings(&["Quantum Wi-Fi", "Gourmet dining"]),
    });
    store.create_accommodation(NewAccommodation {
        name: String::from("Tranquility Lunar Base"),
        description: String::from(
            "Our flagship lunar habitat near the historic Apollo landing sites, featuring Earth views and lunar excursions.",
        ),
        destination_id: moon.id,
        image_url: String::from("https://images.unsplash.com/photo-1503751071777-d2918b21bbd9?auto=format&fit=crop&w=600&q=80"),
        capacity: 24,
        size: 650,
        price_per_night: 18_000,
        amenities: strings(&["1/6 Earth gravity", "Rover access"]),
    });
    store.create_accommodation(NewAccommodation {
        name: String::from("Olympus Mars Habitat"),
        description: String::from(
            "Our premier Martian colony at the base of Olympus Mons, with terraformed gardens and red planet exploration.",
        ),
        destination_id: mars.id,
        image_url: String::from("https://images.unsplash.com/photo-1614313913007-2b4ae8ce32d6?auto=format&fit=crop&w=600&q=80"),
        capacity: 18,
        size: 800,
        price_per_night: 26_000,
        amenities: strings(&["Terraformed garden", "Volcano views"]),
    });
    store.create_accommodation(NewAccommodation {
        name: String::from("Cosmos Luxury Space Yacht"),
        description: String::from(
            "A private space yacht with a full crew at your service. Chart your own course.",
        ),
        destination_id: iss.id,
        image_url: String::from("https://images.unsplash.com/photo-1531306728370-e2ebd9d7bb99?auto=format&fit=crop&w=600&q=80"),
        capacity: 8,
        size: 350,
        price_per_night: 55_000,
        amenities: strings(&["Premium bar", "Custom itinerary"]),
    });

    store.create_experience(NewExperience {
        name: String::from("Zero-G Floating"),
        description: String::from(
            "True weightlessness in specially designed zero gravity chambers. Float freely as astronauts do.",
        ),
        destination_id: iss.id,
        image_url: String::from("https://images.unsplash.com/photo-1536697246787-1f7ae568d89a?auto=format&fit=crop&w=600&q=80"),
        duration: 90,
        price: 8_500,
    });
    store.create_experience(NewExperience {
        name: String::from("Guided Space Walk"),
        description: String::from(
            "Step outside the spacecraft in cutting-edge EVA suits for an unforgettable view of Earth.",
        ),
        destination_id: iss.id,
        image_url: String::from("https://images.unsplash.com/photo-1454789548928-9efd52dc4031?auto=format&fit=crop&w=600&q=80"),
        duration: 120,
        price: 25_000,
    });
    store.create_experience(NewExperience {
        name: String::from("Lunar Rover Expedition"),
        description: String::from(
            "Explore the lunar surface in advanced rovers. Visit historic Apollo landing sites and undiscovered territory.",
        ),
        destination_id: moon.id,
        image_url: String::from("https://images.unsplash.com/photo-1446776877081-d282a0f896e2?auto=format&fit=crop&w=600&q=80"),
        duration: 240,
        price: 15_000,
    });
    store.create_experience(NewExperience {
        name: String::from("Advanced Astrophotography"),
        description: String::from(
            "Capture breathtaking images of space with professional-grade equipment and expert guidance.",
        ),
        destination_id: iss.id,
        image_url: String::from("https://images.unsplash.com/photo-1451187580459-43490279c0fa?auto=format&fit=crop&w=600&q=80"),
        duration: 180,
        price: 5_800,
    });
    store.create_experience(NewExperience {
        name: String::from("Martian Geology Expedition"),
        description: String::from(
            "Join scientists on a geological survey of Mars. Collect samples and discover the planet's ancient secrets.",
        ),
        destination_id: mars.id,
        image_url: String::from("https://images.unsplash.com/photo-1614728894747-a83421e2b9c9?auto=format&fit=crop&w=600&q=80"),
        duration: 480,
        price: 18_500,
    });
    store.create_experience(NewExperience {
        name: String::from("Molecular Gastronomy in Space"),
        description: String::from(
            "A multi-course fine dining experience prepared by renowned chefs, crafted for zero-G environments.",
        ),
        destination_id: iss.id,
        image_url: String::from("https://images.unsplash.com/photo-1604909052743-94e838986d24?auto=format&fit=crop&w=600&q=80"),
        duration: 120,
        price: 3_200,
    });
}

#[cfg(test)]
mod tests {
    use crate::model::DestinationType;
    use crate::store::MemStore;

    use super::seed_catalog;

    #[test]
    fn seeds_full_catalogue() {
        let mut store = MemStore::new();
        seed_catalog(&mut store);

        assert_eq!(store.destinations().len(), 3);
        assert_eq!(store.travel_classes().len(), 3);
        assert_eq!(store.accommodations().len(), 4);
        assert_eq!(store.experiences().len(), 6);
        assert_eq!(
            store.destination(3).map(|d| d.kind),
            Some(DestinationType::Planetary)
        );
        assert_eq!(store.accommodations_for(1).len(), 2);
        assert_eq!(store.experiences_for(1).len(), 4);
    }
}

//! Built-in sample catalog shown when the backend cannot be reached.

use rust_decimal::Decimal;

use momos_mart_core::{Price, ProductId};

use super::ProductRecord;

struct Sample {
    id: u64,
    name: &'static str,
    description: &'static str,
    full_description: &'static str,
    cents: i64,
    image: &'static str,
}

const SAMPLES: [Sample; 4] = [
    Sample {
        id: 1,
        name: "Premium Wireless Headphones",
        description: "High-quality wireless headphones with noise cancellation",
        full_description: "Experience premium sound quality with our advanced wireless headphones featuring active noise cancellation, 30-hour battery life, and premium materials. Perfect for music lovers and professionals alike.",
        cents: 29_999,
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&h=600&fit=crop",
    },
    Sample {
        id: 2,
        name: "Smart Fitness Watch",
        description: "Track your fitness goals with this advanced smartwatch",
        full_description: "Stay connected and track your health with our advanced fitness watch. Features include heart rate monitoring, GPS tracking, water resistance, and 7-day battery life.",
        cents: 24_999,
        image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800&h=600&fit=crop",
    },
    Sample {
        id: 3,
        name: "Wireless Charging Pad",
        description: "Fast wireless charging for all compatible devices",
        full_description: "Charge your devices effortlessly with our fast wireless charging pad. Compatible with all Qi-enabled devices, featuring LED indicators and over-heat protection.",
        cents: 4_999,
        image: "https://images.unsplash.com/photo-1609592606823-b8176ad0c631?w=800&h=600&fit=crop",
    },
    Sample {
        id: 4,
        name: "Bluetooth Speaker",
        description: "Portable speaker with amazing sound quality",
        full_description: "Take your music anywhere with our portable Bluetooth speaker. Features 360-degree sound, waterproof design, and 12-hour battery life.",
        cents: 12_999,
        image: "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=800&h=600&fit=crop",
    },
];

impl Sample {
    fn to_record(&self) -> ProductRecord {
        ProductRecord {
            id: ProductId::from(self.id),
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            price: Price::new(Decimal::new(self.cents, 2)),
            full_description: Some(self.full_description.to_owned()),
            images: vec![self.image.to_owned()],
            image: None,
            category: None,
            brand: None,
            stock_quantity: None,
            sku: None,
            tags: Vec::new(),
            features: Vec::new(),
        }
    }
}

/// The four sample products, in catalog order.
#[must_use]
pub fn sample_products() -> Vec<ProductRecord> {
    SAMPLES.iter().map(Sample::to_record).collect()
}

/// Look up a sample product by numeric ID.
///
/// Non-numeric IDs never match.
#[must_use]
pub fn find_sample(id: &ProductId) -> Option<ProductRecord> {
    let wanted = id.as_number()?;
    SAMPLES
        .iter()
        .find(|sample| sample.id == wanted)
        .map(Sample::to_record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog() {
        let products = sample_products();
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Premium Wireless Headphones",
                "Smart Fitness Watch",
                "Wireless Charging Pad",
                "Bluetooth Speaker",
            ]
        );
        assert!(products.iter().all(|p| p.main_image().is_some()));
    }

    #[test]
    fn test_find_sample_by_numeric_id() {
        let found = find_sample(&ProductId::new("3")).unwrap();
        assert_eq!(found.name, "Wireless Charging Pad");
        assert_eq!(found.price.display(), "$49.99");
    }

    #[test]
    fn test_find_sample_misses() {
        assert!(find_sample(&ProductId::new("5")).is_none());
        assert!(find_sample(&ProductId::new("65f0a1")).is_none());
    }
}

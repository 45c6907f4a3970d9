use serde::{Deserialize, Serialize};

/// A purchasable variant of a product with its own unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub key: String,
    pub label: String,
    pub price: f64,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub options: Vec<ProductOption>,
}

impl ProductOption {
    pub fn new(key: &str, label: &str, price: f64, desc: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            price,
            desc: desc.to_string(),
        }
    }
}

impl Product {
    pub fn new(id: &str, name: &str, options: Vec<ProductOption>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            options,
        }
    }

    pub fn find_option(&self, option_key: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.key == option_key)
    }

    /// The option a product card shows before the user picks one.
    pub fn default_option(&self) -> Option<&ProductOption> {
        self.options.first()
    }
}

/// Read-only product table. Built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn default_catalog() -> Self {
        Self::new(vec![
            Product::new(
                "laptop",
                "Laptop",
                vec![
                    ProductOption::new("i5", "Core i5 / 8GB", 800.0, "Good for study and office."),
                    ProductOption::new("i7", "Core i7 / 16GB", 1100.0, "Faster for heavy tasks."),
                    ProductOption::new("i9", "Core i9 / 32GB", 1600.0, "High performance."),
                ],
            ),
            Product::new(
                "phone",
                "Phone",
                vec![
                    ProductOption::new("64", "64GB", 600.0, "Compact storage."),
                    ProductOption::new("128", "128GB", 750.0, "Best value storage."),
                    ProductOption::new("256", "256GB", 900.0, "Large storage."),
                ],
            ),
            Product::new(
                "headphones",
                "Headphones",
                vec![
                    ProductOption::new("wired", "Wired", 80.0, "No charging needed."),
                    ProductOption::new("bt", "Bluetooth", 140.0, "Wireless freedom."),
                    ProductOption::new("anc", "Bluetooth + ANC", 220.0, "Noise cancellation."),
                ],
            ),
        ])
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_option(&self, product_id: &str, option_key: &str) -> Option<&ProductOption> {
        self.find_product(product_id)?.find_option(option_key)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

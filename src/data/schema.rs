//! SQLite DDL and the stock catalog inserted on first start.

/// Executed statement by statement; keep `;` out of comments.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    brand TEXT NOT NULL,
    model TEXT NOT NULL,
    year INTEGER NOT NULL,
    price REAL NOT NULL,
    body_type TEXT NOT NULL,
    fuel TEXT NOT NULL,
    transmission TEXT NOT NULL,
    image TEXT NULL,
    description TEXT NULL,
    available INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    vehicle_id INTEGER NULL REFERENCES vehicles(id),
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    message TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'Pendiente',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_appointments_user_id ON appointments(user_id);

CREATE TABLE IF NOT EXISTS financing_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    vehicle_id INTEGER NOT NULL REFERENCES vehicles(id),
    down_payment REAL NOT NULL,
    term_months INTEGER NOT NULL,
    monthly_payment REAL NOT NULL,
    principal REAL NOT NULL,
    occupation TEXT NULL,
    income REAL NULL,
    tenure TEXT NULL,
    status TEXT NOT NULL DEFAULT 'Solicitud enviada',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_financing_requests_user_id ON financing_requests(user_id)
"#;

/// A catalog entry before it has an id.
pub struct CatalogEntry {
    pub brand: &'static str,
    pub model: &'static str,
    pub year: i64,
    pub price: f64,
    pub body_type: &'static str,
    pub fuel: &'static str,
    pub transmission: &'static str,
    pub image: &'static str,
    pub description: &'static str,
}

const fn entry(
    brand: &'static str,
    model: &'static str,
    price: f64,
    body_type: &'static str,
    transmission: &'static str,
    image: &'static str,
    description: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        brand,
        model,
        year: 2024,
        price,
        body_type,
        fuel: "Gasolina",
        transmission,
        image,
        description,
    }
}

pub const STOCK_CATALOG: [CatalogEntry; 8] = [
    entry("Toyota", "Corolla", 380_000.0, "Sedan", "Automática", "/images/toyota-corolla.jpg", "Sedan confiable"),
    entry("Honda", "Civic", 420_000.0, "Sedan", "Manual", "/images/honda-civic.jpg", "Deportivo elegante"),
    entry("Ford", "F-150", 750_000.0, "Pickup", "Automática", "/images/ford-f150.jpg", "Pickup potente"),
    entry("Chevrolet", "Suburban", 920_000.0, "SUV", "Automática", "/images/chevrolet-suburban.jpg", "SUV familiar"),
    entry("Nissan", "Sentra", 350_000.0, "Sedan", "CVT", "/images/nissan-sentra.jpg", "Compacto moderno"),
    entry("Volkswagen", "Tiguan", 580_000.0, "SUV", "Automática", "/images/volkswagen-tiguan.jpg", "SUV alemán"),
    entry("Mazda", "CX-5", 520_000.0, "SUV", "Automática", "/images/mazda-cx5.jpg", "SUV premium"),
    entry("Hyundai", "Elantra", 395_000.0, "Sedan", "Automática", "/images/hyundai-elantra.jpg", "Sedan moderno"),
];

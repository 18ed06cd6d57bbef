//! Sample data for a fresh store.
//!
//! Everything is loaded through the inventory service, so the sample obeys
//! the same validation and stock rules as user input. Dates are relative to
//! the inventory's reference date and never lie in the future.

use chrono::Days;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::inventory::Inventory;
use crate::model::{
    CategoryDraft, DistributorDraft, ExpiryDraft, MovementDraft, MovementKind, ProductDraft,
    ProductStatus, SupplierDraft, UnitDraft,
};

/// Number of records loaded per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Categories created.
    pub categories: usize,
    /// Units of measure created.
    pub units: usize,
    /// Suppliers created.
    pub suppliers: usize,
    /// Distributors created.
    pub distributors: usize,
    /// Products created.
    pub products: usize,
    /// Movements recorded.
    pub movements: usize,
    /// Expiry entries registered.
    pub expirations: usize,
}

const CATEGORIES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Fertilizantes",
        "Productos para nutrir el suelo y los cultivos",
        "Insumo",
        "2 años",
        "Saco",
    ),
    (
        "Herramientas",
        "Equipos y utensilios para labores del campo",
        "Equipo",
        "No aplica",
        "Unidad",
    ),
    (
        "Semillas",
        "Semillas certificadas para siembra",
        "Insumo",
        "1 año",
        "Bolsa",
    ),
    (
        "Agroquímicos",
        "Herbicidas, insecticidas y fungicidas",
        "Insumo",
        "2 años",
        "Litro",
    ),
];

const UNITS: &[(&str, &str, Option<&str>)] = &[
    ("Kilogramo", "kg", Some("Unidad de masa")),
    ("Litro", "L", Some("Unidad de volumen")),
    ("Saco", "saco", Some("Saco de 50 kg")),
    ("Bolsa", "bolsa", None),
];

const SUPPLIERS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Fabricante",
        "Fertilizantes Colombianos S.A.",
        "+57 (5) 672-3400",
        "ventas@fertilcol.com",
        "Zona Industrial Mamonal, Cartagena",
    ),
    (
        "Mayorista",
        "Semillas Premium Ltda",
        "+57 (2) 485-1200",
        "pedidos@semillaspremium.com",
        "Km 5 vía Palmira, Valle del Cauca",
    ),
    (
        "Importador",
        "Agroquímicos del Oriente",
        "+57 (7) 634-9900",
        "contacto@agroriente.com",
        "Calle 36 #15-32, Bucaramanga",
    ),
];

struct SampleProduct {
    code: &'static str,
    name: &'static str,
    description: &'static str,
    lot: Option<&'static str>,
    category: usize,
    unit: Option<usize>,
    min_stock: i64,
    unit_cost: i64,
    unit_price: i64,
    supplier: Option<usize>,
}

const PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        code: "PROD001",
        name: "Urea Granulada 46%",
        description: "Fertilizante nitrogenado de alta concentración",
        lot: Some("UREA-2024-01"),
        category: 0,
        unit: Some(2),
        min_stock: 50,
        unit_cost: 85_000,
        unit_price: 98_000,
        supplier: Some(0),
    },
    SampleProduct {
        code: "PROD002",
        name: "Glifosato 48%",
        description: "Herbicida sistémico no selectivo",
        lot: Some("GLIFO-2024-A15"),
        category: 3,
        unit: Some(1),
        min_stock: 30,
        unit_cost: 32_000,
        unit_price: 38_500,
        supplier: Some(2),
    },
    SampleProduct {
        code: "PROD003",
        name: "Semilla Maíz Híbrido ICA V-305",
        description: "Maíz amarillo de alto rendimiento para clima cálido",
        lot: Some("MAIZ-V305-03"),
        category: 2,
        unit: Some(3),
        min_stock: 20,
        unit_cost: 145_000,
        unit_price: 168_000,
        supplier: Some(1),
    },
    SampleProduct {
        code: "PROD004",
        name: "Insecticida Cipermetrina 25%",
        description: "Insecticida piretroide de amplio espectro",
        lot: Some("CIPER-2023-B07"),
        category: 3,
        unit: Some(1),
        min_stock: 15,
        unit_cost: 41_000,
        unit_price: 49_000,
        supplier: Some(2),
    },
    SampleProduct {
        code: "PROD005",
        name: "Fertilizante Orgánico Compost",
        description: "Abono orgánico compostado",
        lot: Some("COMP-24-11"),
        category: 0,
        unit: Some(2),
        min_stock: 25,
        unit_cost: 28_000,
        unit_price: 35_000,
        supplier: Some(0),
    },
    SampleProduct {
        code: "PROD006",
        name: "Kit de Análisis de Suelo",
        description: "Kit para medir pH y nutrientes del suelo",
        lot: None,
        category: 1,
        unit: None,
        min_stock: 10,
        unit_cost: 120_000,
        unit_price: 150_000,
        supplier: None,
    },
    SampleProduct {
        code: "PROD007",
        name: "Pala Agrícola",
        description: "Pala de acero con mango de madera",
        lot: None,
        category: 1,
        unit: None,
        min_stock: 5,
        unit_cost: 35_000,
        unit_price: 45_000,
        supplier: None,
    },
];

/// (days ago, product, kind, quantity, recorded by, notes), oldest first.
const MOVEMENTS: &[(u64, usize, MovementKind, i64, &str, &str)] = &[
    (90, 0, MovementKind::Entry, 600, "Carlos Mendoza", "Orden de compra OC-1021"),
    (90, 1, MovementKind::Entry, 200, "Carlos Mendoza", "Orden de compra OC-1022"),
    (90, 2, MovementKind::Entry, 120, "Carlos Mendoza", "Orden de compra OC-1023"),
    (90, 3, MovementKind::Entry, 80, "Carlos Mendoza", "Orden de compra OC-1024"),
    (90, 4, MovementKind::Entry, 300, "Carlos Mendoza", "Orden de compra OC-1025"),
    (90, 5, MovementKind::Entry, 15, "Carlos Mendoza", "Compra directa"),
    (90, 6, MovementKind::Entry, 40, "Carlos Mendoza", "Compra directa"),
    (80, 0, MovementKind::Exit, 150, "Ana García", "Venta a productor Juan Pérez"),
    (62, 1, MovementKind::Exit, 60, "Ana García", "Venta Finca La Esperanza"),
    (45, 2, MovementKind::Exit, 50, "Luis Rodríguez", "Siembra cooperativa El Progreso"),
    (40, 4, MovementKind::Exit, 120, "Ana García", "Venta a vivero Los Pinos"),
    (35, 0, MovementKind::Entry, 200, "Carlos Mendoza", "Orden de compra OC-1040"),
    (35, 1, MovementKind::Entry, 50, "Carlos Mendoza", "Orden de compra OC-1041"),
    (28, 0, MovementKind::Exit, 180, "Luis Rodríguez", "Despacho a Hacienda San José"),
    (21, 3, MovementKind::Exit, 45, "Ana García", "Control de plagas cultivo de arroz"),
    (14, 5, MovementKind::Exit, 9, "Luis Rodríguez", "Asistencia técnica"),
    (10, 1, MovementKind::Exit, 70, "Ana García", "Venta a productor Juan Pérez"),
    (7, 0, MovementKind::Exit, 220, "Ana García", "Venta Finca La Esperanza"),
    (5, 2, MovementKind::Exit, 40, "Luis Rodríguez", "Siembra cooperativa El Progreso"),
    (3, 4, MovementKind::Exit, 95, "Ana García", "Venta a vivero Los Pinos"),
    (2, 3, MovementKind::Exit, 35, "Luis Rodríguez", "Control de plagas cultivo de café"),
    (1, 1, MovementKind::Exit, 45, "Ana García", "Venta a productor Juan Pérez"),
];

/// (product, lot, quantity, days from today; negative is already past).
const EXPIRATIONS: &[(usize, &str, i64, i64)] = &[
    (1, "GLIFO-2024-A15", 75, 12),
    (3, "CIPER-2023-B07", 20, -5),
    (2, "MAIZ-V305-03", 30, 120),
    (4, "COMP-24-11", 85, 25),
];

/// Load the sample data through `inventory`.
///
/// Either everything is loaded or nothing is.
///
/// # Errors
///
/// Returns an error if any record is rejected or cannot be stored.
pub fn load(inventory: &Inventory) -> Result<SeedSummary> {
    inventory.storage().atomically(|_| load_all(inventory))
}

fn load_all(inventory: &Inventory) -> Result<SeedSummary> {
    let today = inventory.today();
    let mut summary = SeedSummary::default();

    let mut categories = Vec::new();
    for (name, description, kind, shelf_life, presentation) in CATEGORIES {
        let saved = inventory.create_category(CategoryDraft {
            name: (*name).to_string(),
            description: (*description).to_string(),
            kind: (*kind).to_string(),
            shelf_life: (*shelf_life).to_string(),
            presentation: (*presentation).to_string(),
        })?;
        categories.push(saved.record.id);
    }
    summary.categories = categories.len();

    let mut units = Vec::new();
    for (name, abbreviation, description) in UNITS {
        let saved = inventory.create_unit(UnitDraft {
            name: (*name).to_string(),
            abbreviation: (*abbreviation).to_string(),
            description: description.map(str::to_string),
        })?;
        units.push(saved.record.id);
    }
    summary.units = units.len();

    let mut suppliers = Vec::new();
    for (kind, name, phone, email, address) in SUPPLIERS {
        let saved = inventory.create_supplier(SupplierDraft {
            kind: Some((*kind).to_string()),
            name: (*name).to_string(),
            phone: (*phone).to_string(),
            email: (*email).to_string(),
            address: (*address).to_string(),
            active: true,
        })?;
        suppliers.push(saved.record.id);
    }
    summary.suppliers = suppliers.len();

    inventory.create_distributor(DistributorDraft {
        supplier_id: suppliers.first().copied(),
        name: "AgroDistribuidor Central".to_string(),
        phone: "+57 (1) 234-5678".to_string(),
        email: "logistica@agrocentral.com".to_string(),
        address: "Calle 45 #23-67, Bogotá".to_string(),
        delivery_route: Some("Sabana de Bogotá y Boyacá".to_string()),
        active: true,
    })?;
    summary.distributors = 1;

    let mut products = Vec::new();
    for sample in PRODUCTS {
        let saved = inventory.create_product(ProductDraft {
            code: sample.code.to_string(),
            name: sample.name.to_string(),
            description: sample.description.to_string(),
            lot: sample.lot.map(str::to_string),
            category_id: categories.get(sample.category).copied(),
            unit_id: sample.unit.and_then(|i| units.get(i).copied()),
            stock: None,
            min_stock: sample.min_stock,
            unit_cost: Some(Decimal::from(sample.unit_cost)),
            unit_price: Some(Decimal::from(sample.unit_price)),
            status: ProductStatus::Active,
        })?;
        let id = saved.record.id;
        if let Some(supplier) = sample.supplier.and_then(|i| suppliers.get(i)) {
            inventory.assign_supplier(id, *supplier)?;
        }
        products.push(id);
    }
    summary.products = products.len();

    for (days_ago, product, kind, quantity, recorded_by, notes) in MOVEMENTS {
        let Some(product_id) = products.get(*product).copied() else {
            continue;
        };
        inventory.create_movement(MovementDraft {
            date: today - Days::new(*days_ago),
            kind: *kind,
            product_id,
            quantity: *quantity,
            recorded_by: (*recorded_by).to_string(),
            notes: (*notes).to_string(),
        })?;
        summary.movements += 1;
    }

    for (product, lot, quantity, offset) in EXPIRATIONS {
        let Some(product_id) = products.get(*product).copied() else {
            continue;
        };
        let days = Days::new(offset.unsigned_abs());
        let expires_on = if *offset < 0 { today - days } else { today + days };
        inventory.create_expiry(ExpiryDraft {
            product_id,
            lot: Some((*lot).to_string()),
            quantity: *quantity,
            expires_on,
        })?;
        summary.expirations += 1;
    }

    debug!("Sample data loaded: {summary:?}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::expiry::ExpiryStatus;
    use crate::stock::RestockUrgency;

    fn seeded() -> Inventory {
        let inventory = Inventory::in_memory()
            .unwrap()
            .with_today(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        load(&inventory).unwrap();
        inventory
    }

    #[test]
    fn test_summary_matches_store() {
        let inventory = Inventory::in_memory().unwrap();
        let summary = load(&inventory).unwrap();
        let stats = inventory.stats().unwrap();

        assert_eq!(summary.categories, 4);
        assert_eq!(summary.products, 7);
        assert_eq!(stats.products, 7);
        assert_eq!(stats.movements, 22);
        assert_eq!(stats.expirations, 4);
    }

    #[test]
    fn test_stock_follows_history() {
        let inventory = seeded();
        assert!(inventory.reconcile().unwrap().is_empty());

        let stock: Vec<(String, i64)> = inventory
            .list_products(None, None)
            .unwrap()
            .into_iter()
            .map(|p| (p.code, p.stock))
            .collect();
        assert!(stock.contains(&("PROD001".to_string(), 250)));
        assert!(stock.contains(&("PROD002".to_string(), 75)));
        assert!(stock.contains(&("PROD004".to_string(), 0)));
    }

    #[test]
    fn test_sample_raises_alerts() {
        let inventory = seeded();

        let low = inventory.low_stock_alerts().unwrap();
        let names: Vec<&str> = low.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Insecticida Cipermetrina 25%", "Kit de Análisis de Suelo"]
        );
        assert_eq!(low[0].urgency, RestockUrgency::High);

        let expiring = inventory.expiring(None, None).unwrap();
        assert_eq!(expiring.len(), 3);
        assert_eq!(expiring[0].status, ExpiryStatus::Expired);
    }

    #[test]
    fn test_failed_load_is_rolled_back() {
        let inventory = seeded();
        // A second load collides with the existing names and rolls back.
        assert!(load(&inventory).is_err());
        assert_eq!(inventory.stats().unwrap().categories, 4);
    }
}

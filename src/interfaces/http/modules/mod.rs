pub mod ajustes;
pub mod auth;
pub mod dashboard;
pub mod dotacion;
pub mod health;
pub mod inventario;
pub mod jornadas;
pub mod metrics;
pub mod personal;
pub mod request_id;
pub mod rutas;
pub mod sedes;

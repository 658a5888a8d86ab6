//! Screen access rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::ModuleAccess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Dashboard,
    Jornadas,
    Personal,
    Dotacion,
    Sedes,
    Inventario,
    Rutas,
    Ajustes,
    /// Data export section of the settings screen
    Reportes,
}

impl Module {
    pub const ALL: [Module; 9] = [
        Module::Dashboard,
        Module::Jornadas,
        Module::Personal,
        Module::Dotacion,
        Module::Sedes,
        Module::Inventario,
        Module::Rutas,
        Module::Ajustes,
        Module::Reportes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Jornadas => "jornadas",
            Module::Personal => "personal",
            Module::Dotacion => "dotacion",
            Module::Sedes => "sedes",
            Module::Inventario => "inventario",
            Module::Rutas => "rutas",
            Module::Ajustes => "ajustes",
            Module::Reportes => "reportes",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Module::Dashboard),
            "jornadas" => Ok(Module::Jornadas),
            "personal" => Ok(Module::Personal),
            "dotacion" => Ok(Module::Dotacion),
            "sedes" => Ok(Module::Sedes),
            "inventario" => Ok(Module::Inventario),
            "rutas" => Ok(Module::Rutas),
            "ajustes" => Ok(Module::Ajustes),
            "reportes" => Ok(Module::Reportes),
            other => Err(format!("Unknown module: {}", other)),
        }
    }
}

/// Whether a user with `role` and `grants` may open `module`.
///
/// Only the restricted role is checked; every other role sees everything.
pub fn has_access(role: &str, grants: &ModuleAccess, module: Module) -> bool {
    if role != super::RESTRICTED_ROLE {
        return true;
    }
    match module {
        Module::Personal => grants.personal,
        Module::Dotacion => grants.dotacion,
        Module::Sedes => grants.clientes,
        Module::Reportes => false,
        Module::Dashboard
        | Module::Jornadas
        | Module::Inventario
        | Module::Rutas
        | Module::Ajustes => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_roles_see_everything() {
        for role in ["Administrador", "Coordinador", ""] {
            for module in Module::ALL {
                assert!(has_access(role, &ModuleAccess::default(), module), "{role} {module}");
            }
        }
    }

    #[test]
    fn auxiliar_needs_explicit_grants() {
        let none = ModuleAccess::default();
        assert!(!has_access("Auxiliar", &none, Module::Personal));
        assert!(!has_access("Auxiliar", &none, Module::Dotacion));
        assert!(!has_access("Auxiliar", &none, Module::Sedes));
        assert!(has_access("Auxiliar", &none, Module::Dashboard));
        assert!(has_access("Auxiliar", &none, Module::Jornadas));
        assert!(has_access("Auxiliar", &none, Module::Ajustes));

        let personal_only = ModuleAccess {
            personal: true,
            ..Default::default()
        };
        assert!(has_access("Auxiliar", &personal_only, Module::Personal));
        assert!(!has_access("Auxiliar", &personal_only, Module::Sedes));

        let clientes = ModuleAccess {
            clientes: true,
            ..Default::default()
        };
        assert!(has_access("Auxiliar", &clientes, Module::Sedes));
    }

    #[test]
    fn auxiliar_never_exports() {
        let all = ModuleAccess {
            personal: true,
            dotacion: true,
            clientes: true,
        };
        assert!(!has_access("Auxiliar", &all, Module::Reportes));
    }

    #[test]
    fn module_names_parse() {
        for module in Module::ALL {
            assert_eq!(module.as_str().parse::<Module>(), Ok(module));
        }
        assert!("admin".parse::<Module>().is_err());
    }
}

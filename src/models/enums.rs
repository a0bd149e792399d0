//! Closed string enumerations shared by the models
//!
//! Each enum is stored as a TEXT column (guarded by a CHECK constraint in the
//! migrations) and travels over JSON with the same upper-case label.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements `Display`, `FromStr` and the sqlx TEXT conversions for a
/// label-backed enum.
macro_rules! text_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($label => Ok($ty::$variant),)+
                    _ => Err(format!("Invalid {}: {}", $what, s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role tag carried by every account and session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "MODERATOR")]
    Moderator,
    #[serde(rename = "TECHNICIAN")]
    Technician,
}

text_enum!(Role, "role", {
    Admin => "ADMIN",
    Moderator => "MODERATOR",
    Technician => "TECHNICIAN",
});

// ---------------------------------------------------------------------------
// EquipmentType
// ---------------------------------------------------------------------------

/// Equipment category.
///
/// Declaration order is the order in which quote groups are printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum EquipmentType {
    #[serde(rename = "ANTI INTRUSION")]
    AntiIntrusion,
    #[serde(rename = "INCENDIES")]
    Incendies,
    #[serde(rename = "VIDEO SURVEILLANCE")]
    VideoSurveillance,
    #[serde(rename = "CONTROLE D'ACCES")]
    ControleAcces,
    #[serde(rename = "LSB/ELS")]
    LsbEls,
    #[serde(rename = "GESTION DE CLE")]
    GestionCle,
    #[serde(rename = "CABLES/ACCESSOIRES")]
    CablesAccessoires,
}

text_enum!(EquipmentType, "equipment type", {
    AntiIntrusion => "ANTI INTRUSION",
    Incendies => "INCENDIES",
    VideoSurveillance => "VIDEO SURVEILLANCE",
    ControleAcces => "CONTROLE D'ACCES",
    LsbEls => "LSB/ELS",
    GestionCle => "GESTION DE CLE",
    CablesAccessoires => "CABLES/ACCESSOIRES",
});

// ---------------------------------------------------------------------------
// MovementType
// ---------------------------------------------------------------------------

/// Direction of a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MovementType {
    /// Stock entering the client's site
    #[serde(rename = "ENTREE")]
    Entree,
    /// Stock leaving the client's site
    #[serde(rename = "SORTIE")]
    Sortie,
}

text_enum!(MovementType, "movement type", {
    Entree => "ENTREE",
    Sortie => "SORTIE",
});

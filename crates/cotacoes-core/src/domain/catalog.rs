use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ValidationError;

macro_rules! sectors {
    ($($variant:ident => $wire:literal, $label:literal;)+) => {
        /// Industry classification used by the quotes endpoint (closed set).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Sector {
            $($variant,)+
        }

        impl Sector {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Upstream label, also used as the `sector` query parameter.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Portuguese display label used by the filter menus.
            pub const fn label_pt(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }
    };
}

sectors! {
    RetailTrade => "Retail Trade", "Varejo";
    EnergyMinerals => "Energy Minerals", "Energia Mineral";
    HealthServices => "Health Services", "Serviços de Saúde";
    Utilities => "Utilities", "Serviços Públicos";
    Finance => "Finance", "Financeiro";
    ConsumerServices => "Consumer Services", "Serviços ao Consumidor";
    ConsumerNonDurables => "Consumer Non-Durables", "Bens de Consumo Não Duráveis";
    NonEnergyMinerals => "Non-Energy Minerals", "Minerais Não Energéticos";
    CommercialServices => "Commercial Services", "Serviços Comerciais";
    DistributionServices => "Distribution Services", "Serviços de Distribuição";
    Transportation => "Transportation", "Transporte";
    TechnologyServices => "Technology Services", "Serviços de Tecnologia";
    ProcessIndustries => "Process Industries", "Indústrias de Processos";
    Communications => "Communications", "Comunicações";
    ProducerManufacturing => "Producer Manufacturing", "Indústria Produtora";
    Miscellaneous => "Miscellaneous", "Diversos";
    ElectronicTechnology => "Electronic Technology", "Tecnologia Eletrônica";
    IndustrialServices => "Industrial Services", "Serviços Industriais";
    HealthTechnology => "Health Technology", "Tecnologia em Saúde";
    ConsumerDurables => "Consumer Durables", "Bens de Consumo Duráveis";
}

impl Display for Sector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|sector| sector.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownSector {
                value: trimmed.to_owned(),
            })
    }
}

impl Serialize for Sector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Asset category.
///
/// Upstream has used both `dr` and `bdr` for depositary receipts; both
/// collapse into [`AssetType::DepositaryReceipt`] so filtering and sorting
/// never split one category across two keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetType {
    Stock,
    Fund,
    DepositaryReceipt,
}

impl AssetType {
    pub const ALL: [Self; 3] = [Self::Stock, Self::Fund, Self::DepositaryReceipt];

    /// Code sent to the quotes endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Fund => "fund",
            Self::DepositaryReceipt => "bdr",
        }
    }

    pub const fn label_pt(self) -> &'static str {
        match self {
            Self::Stock => "Ações",
            Self::Fund => "Fundos de Investimentos",
            Self::DepositaryReceipt => "BDRs",
        }
    }

    /// Resolve an upstream code, collapsing historical aliases.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "stock" => Some(Self::Stock),
            "fund" => Some(Self::Fund),
            "bdr" | "dr" => Some(Self::DepositaryReceipt),
            _ => None,
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_code(value).ok_or_else(|| ValidationError::UnknownAssetType {
            value: value.trim().to_owned(),
        })
    }
}

impl Serialize for AssetType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssetType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

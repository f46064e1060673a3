use std::io::Write;

use frutipos_core::StoreConfig;

use crate::cli::{ConfigCommand, ConfigFields};
use crate::error::AppResult;
use crate::state::{DbState, StoreConfigState};

/// Shows or edits the store configuration. Edits go through
/// [`StoreConfigState::update`], so a rejected value changes nothing.
pub async fn run(
    db: &DbState,
    config: &StoreConfigState,
    action: ConfigCommand,
    out: &mut impl Write,
) -> AppResult<()> {
    match action {
        ConfigCommand::Show => write_config(out, &config.get())?,
        ConfigCommand::Set(fields) => {
            let saved = config.update(db.inner(), |c| apply(c, fields)).await?;
            writeln!(out, "Configuración guardada")?;
            write_config(out, &saved)?;
        }
    }
    Ok(())
}

fn apply(config: &mut StoreConfig, fields: ConfigFields) {
    if let Some(name) = fields.name {
        config.name = name.trim().to_string();
    }
    if let Some(address) = fields.address {
        config.address = address;
    }
    if let Some(phone) = fields.phone {
        config.phone = phone;
    }
    if let Some(rate) = fields.tax_rate {
        config.tax_rate = rate;
    }
    if let Some(nit) = fields.nit {
        config.nit = nit;
    }
    if let Some(url) = fields.logo_url {
        config.logo_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
    }
}

fn write_config(out: &mut impl Write, config: &StoreConfig) -> std::io::Result<()> {
    writeln!(out, "Nombre:     {}", config.name)?;
    writeln!(out, "Dirección:  {}", config.address)?;
    writeln!(out, "Teléfono:   {}", config.phone)?;
    writeln!(out, "NIT:        {}", config.nit)?;
    writeln!(
        out,
        "IVA:        {}%",
        config.effective_tax_rate().percentage()
    )?;
    if let Some(url) = &config.logo_url {
        writeln!(out, "Logo:       {}", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frutipos_db::{Database, DbConfig};

    #[test]
    fn test_apply_only_given_fields() {
        let mut config = StoreConfig::default();
        apply(
            &mut config,
            ConfigFields {
                tax_rate: Some(0.19),
                logo_url: Some("  ".to_string()),
                ..ConfigFields::default()
            },
        );

        assert_eq!(config.tax_rate, 0.19);
        assert_eq!(config.name, StoreConfig::default().name);
        assert!(config.logo_url.is_none());
    }

    #[tokio::test]
    async fn test_invalid_tax_rate_is_rejected() {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let config = StoreConfigState::load(db.inner()).await.unwrap();
        let mut out = Vec::new();

        let result = run(
            &db,
            &config,
            ConfigCommand::Set(ConfigFields {
                tax_rate: Some(1.5),
                ..ConfigFields::default()
            }),
            &mut out,
        )
        .await;

        assert!(result.is_err());
        assert!(config.tax_rate().is_zero());
    }
}

//! Validate command - run one field validator on a value.

use clap::{Args, ValueEnum};
use console::style;

use cadastro_core::extract::rules::{
    format_cep, format_cnpj, format_cpf, format_phone, validate_cep, validate_cnpj, validate_cpf,
    validate_cpf_checksum, validate_email, validate_phone,
};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Kind of value
    #[arg(value_enum)]
    kind: ValueKind,

    /// Value to check
    value: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ValueKind {
    /// Company tax ID (CNPJ, with check digits)
    Cnpj,
    /// Personal tax ID (CPF, with check digits)
    Cpf,
    /// Brazilian phone number with area code
    Phone,
    /// Email address
    Email,
    /// Postal code (CEP)
    Cep,
}

/// Validity of `value` and its canonical rendering.
fn check(kind: ValueKind, value: &str) -> (bool, String) {
    match kind {
        ValueKind::Cnpj => {
            // Bare digits are checked in their formatted layout.
            let formatted = format_cnpj(value);
            (validate_cnpj(&formatted), formatted)
        }
        ValueKind::Cpf => (
            validate_cpf(value) && validate_cpf_checksum(value),
            format_cpf(value),
        ),
        ValueKind::Phone => (validate_phone(value), format_phone(value)),
        ValueKind::Email => (validate_email(value.trim()), value.trim().to_string()),
        ValueKind::Cep => (validate_cep(value), format_cep(value)),
    }
}

pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let (valid, formatted) = check(args.kind, &args.value);

    if valid {
        println!("{} {}", style("✓").green(), formatted);
        Ok(())
    } else {
        anyhow::bail!("Invalid {:?}: {}", args.kind, args.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_formats_valid_values() {
        assert_eq!(
            check(ValueKind::Cnpj, "11222333000181"),
            (true, "11.222.333/0001-81".to_string())
        );
        assert_eq!(
            check(ValueKind::Cep, "01310100"),
            (true, "01310-100".to_string())
        );
    }

    #[test]
    fn test_check_rejects_bad_digits() {
        assert!(!check(ValueKind::Cnpj, "11.222.333/0001-82").0);
        assert!(!check(ValueKind::Cnpj, "11222333000182").0);
        assert!(!check(ValueKind::Cnpj, "529.982.247-25").0);
        assert!(!check(ValueKind::Cpf, "111.111.111-11").0);
        assert!(!check(ValueKind::Email, "contato.acme.com").0);
    }
}

//! Seeds a demo tenant with a chart-of-accounts template clone, a cash
//! box, and a bank account.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use tracing::info;
use uuid::Uuid;

use balanza_core::coa::{AccountKind, TemplateAccount};
use balanza_db::entities::{bank_accounts, cash_boxes, people, tenants};
use balanza_db::repositories::AccountRepository;

fn template_account(code: &str, name: &str, kind: AccountKind, parent: Option<&str>) -> TemplateAccount {
    TemplateAccount {
        code: code.to_string(),
        name: name.to_string(),
        kind,
        parent_code: parent.map(str::to_string),
    }
}

/// Minimal SMB chart-of-accounts template.
fn default_template() -> Vec<TemplateAccount> {
    vec![
        template_account("1", "Activo", AccountKind::Asset, None),
        template_account("1.1", "Activo corriente", AccountKind::Asset, Some("1")),
        template_account("1.1.1", "Caja", AccountKind::Asset, Some("1.1")),
        template_account("1.1.2", "Bancos", AccountKind::Asset, Some("1.1")),
        template_account("1.1.3", "Cuentas por cobrar", AccountKind::Asset, Some("1.1")),
        template_account("1.1.4", "IVA pagado", AccountKind::Asset, Some("1.1")),
        template_account("2", "Pasivo", AccountKind::Liability, None),
        template_account("2.1", "Pasivo corriente", AccountKind::Liability, Some("2")),
        template_account("2.1.1", "Cuentas por pagar", AccountKind::Liability, Some("2.1")),
        template_account("2.1.2", "IVA cobrado", AccountKind::Liability, Some("2.1")),
        template_account("3", "Patrimonio", AccountKind::Equity, None),
        template_account("4", "Ingresos", AccountKind::Revenue, None),
        template_account("4.1", "Ventas", AccountKind::Revenue, Some("4")),
        template_account("5", "Gastos", AccountKind::Expense, None),
        template_account("5.1", "Compras", AccountKind::Expense, Some("5")),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL")?;
    let db = balanza_db::connect(&database_url).await?;

    let now = Utc::now().into();
    let tenant_id = Uuid::new_v4();

    let tenant = tenants::ActiveModel {
        id: Set(tenant_id),
        legal_name: Set("Comercial Demo S.A.".to_string()),
        ruc: Set("1792146739001".to_string()),
        establishment_code: Set("001".to_string()),
        emission_point_code: Set("001".to_string()),
        sri_environment: Set(1),
        certificate_key: Set(None),
        certificate_password: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    tenant.insert(&db).await?;
    info!(%tenant_id, "tenant created");

    let accounts = AccountRepository::new(db.clone());
    let cloned = accounts.clone_template(tenant_id, &default_template()).await?;
    info!(count = cloned.len(), "chart of accounts cloned");

    let account_by_code = |code: &str| {
        cloned
            .iter()
            .find(|a| a.code == code)
            .map(|a| a.id)
            .expect("template account missing")
    };

    let cash_box = cash_boxes::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        name: Set("Caja principal".to_string()),
        account_id: Set(Some(account_by_code("1.1.1"))),
        created_at: Set(now),
    };
    cash_box.insert(&db).await?;

    let bank_account = bank_accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        bank_name: Set("Banco Pichincha".to_string()),
        account_number: Set("2201234567".to_string()),
        account_id: Set(Some(account_by_code("1.1.2"))),
        created_at: Set(now),
    };
    bank_account.insert(&db).await?;

    let person = people::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        name: Set("Cliente Demo".to_string()),
        tax_id: Set("0102030405".to_string()),
        receivable_account_id: Set(Some(account_by_code("1.1.3"))),
        payable_account_id: Set(Some(account_by_code("2.1.1"))),
        created_at: Set(now),
        updated_at: Set(now),
    };
    person.insert(&db).await?;

    info!("seed complete");
    Ok(())
}

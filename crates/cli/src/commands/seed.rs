//! Seed a fresh database with a demo hierarchy and sample orders.
//!
//! Layout: one MasterAdmin; two SuperAdmins; three Admins (two under the
//! first SuperAdmin); marketers spread across admin assignment, direct
//! SuperAdmin assignment, and unassigned. Emails are fixed, so seeding is
//! for a fresh database only - rerunning fails on the unique constraint.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use vistapro_core::{Email, OrderStatus, Role, UserId};
use vistapro_server::db::{self, OrderRepository, UserRepository};
use vistapro_server::models::order::NewOrder;
use vistapro_server::models::user::{NewUser, User};

use super::{CommandError, database_url};

/// Seed the demo data set.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or any insert
/// fails (including rerunning against an already-seeded database).
pub async fn run() -> Result<(), CommandError> {
    let pool = db::create_pool(&database_url()?).await?;

    tracing::info!("Seeding demo hierarchy...");

    let master = create_user(&pool, "master@vistapro.ng", "Head Office", Role::MasterAdmin, None, None).await?;

    let s1 = create_user(&pool, "ada.super@vistapro.ng", "Ada N.", Role::SuperAdmin, None, None).await?;
    let s2 = create_user(&pool, "emeka.super@vistapro.ng", "Emeka U.", Role::SuperAdmin, None, None).await?;

    let a1 = create_user(&pool, "bola.admin@vistapro.ng", "Bola A.", Role::Admin, None, Some(s1.id)).await?;
    let a2 = create_user(&pool, "chidi.admin@vistapro.ng", "Chidi K.", Role::Admin, None, Some(s1.id)).await?;
    let a3 = create_user(&pool, "funke.admin@vistapro.ng", "Funke L.", Role::Admin, None, Some(s2.id)).await?;

    let m1 = create_user(&pool, "tunde.m@vistapro.ng", "Tunde O.", Role::Marketer, Some(a1.id), None).await?;
    let m2 = create_user(&pool, "ngozi.m@vistapro.ng", "Ngozi E.", Role::Marketer, Some(a1.id), None).await?;
    let m3 = create_user(&pool, "yusuf.m@vistapro.ng", "Yusuf B.", Role::Marketer, Some(a2.id), None).await?;
    let m4 = create_user(&pool, "amina.m@vistapro.ng", "Amina S.", Role::Marketer, None, Some(s1.id)).await?;
    let m5 = create_user(&pool, "ike.m@vistapro.ng", "Ike D.", Role::Marketer, Some(a3.id), None).await?;
    // Registered but not yet assigned to anyone
    create_user(&pool, "seyi.m@vistapro.ng", "Seyi F.", Role::Marketer, None, None).await?;

    tracing::info!("Seeding sample orders...");

    create_order(&pool, m1.id, "Infinix Hot 40", "X6836", 2, dec(220_000_00), 2, OrderStatus::Completed).await?;
    create_order(&pool, m1.id, "Tecno Spark 20", "KJ5", 1, dec(115_500_00), 5, OrderStatus::Approved).await?;
    create_order(&pool, m2.id, "Samsung A15", "SM-A155F", 1, dec(185_000_00), 1, OrderStatus::Pending).await?;
    create_order(&pool, m3.id, "Redmi 13C", "23100RN82L", 3, dec(330_000_00), 9, OrderStatus::Completed).await?;
    create_order(&pool, m4.id, "iPhone 13", "A2633", 1, dec(640_000_00), 4, OrderStatus::Approved).await?;
    create_order(&pool, m5.id, "Itel S23", "S665L", 2, dec(160_000_00), 7, OrderStatus::Rejected).await?;

    tracing::info!(
        master_admin = %master.id,
        super_admins = %format!("{}, {}", s1.id, s2.id),
        "Seed complete"
    );
    Ok(())
}

fn dec(kobo: i64) -> Decimal {
    Decimal::new(kobo, 2)
}

async fn create_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    role: Role,
    admin_id: Option<UserId>,
    super_admin_id: Option<UserId>,
) -> Result<User, CommandError> {
    let repo = UserRepository::new(pool);
    let user = repo
        .create(&NewUser {
            email: Email::parse(email)?,
            name: name.to_owned(),
            role,
            admin_id,
            super_admin_id,
        })
        .await?;

    tracing::debug!(id = %user.id, role = %user.role, "Seeded user");
    Ok(user)
}

async fn create_order(
    pool: &PgPool,
    marketer_id: UserId,
    device_name: &str,
    device_model: &str,
    number_of_devices: i32,
    sold_amount: Decimal,
    days_ago: i64,
    status: OrderStatus,
) -> Result<(), CommandError> {
    let repo = OrderRepository::new(pool);
    let order = repo
        .create(&NewOrder {
            marketer_id,
            device_name: device_name.to_owned(),
            device_model: device_model.to_owned(),
            number_of_devices,
            sold_amount,
            sale_date: Utc::now() - Duration::days(days_ago),
        })
        .await?;

    if status != OrderStatus::Pending {
        repo.update_status(order.id, status).await?;
    }

    Ok(())
}

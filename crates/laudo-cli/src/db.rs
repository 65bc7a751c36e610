use sqlx::PgPool;

pub(crate) async fn run_db_ping(pool: &PgPool) -> anyhow::Result<()> {
    laudo_db::ping(pool).await?;
    println!("database connection ok");
    Ok(())
}

pub(crate) async fn run_db_migrate(pool: &PgPool) -> anyhow::Result<()> {
    let applied = laudo_db::run_migrations(pool).await?;
    tracing::info!(applied, "migrations complete");
    println!("applied {applied} migration(s)");
    Ok(())
}

//! Create `partners` table.
//! Requires PostGIS; geometries are stored in EPSG:4326.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE EXTENSION IF NOT EXISTS postgis")
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Partners::Table)
                    .if_not_exists()
                    .col(uuid(Partners::Id).primary_key())
                    .col(string_len(Partners::TradingName, 255).not_null())
                    .col(string_len(Partners::OwnerName, 255).not_null())
                    .col(string_len(Partners::Document, 50).not_null())
                    .col(
                        ColumnDef::new(Partners::CoverageArea)
                            .custom(Alias::new("geometry(MultiPolygon, 4326)"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Partners::Address)
                            .custom(Alias::new("geometry(Point, 4326)"))
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Document uniqueness lives here, not in application code
        manager
            .create_index(
                Index::create()
                    .name("uniq_partners_document")
                    .table(Partners::Table)
                    .col(Partners::Document)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let conn = manager.get_connection();
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_partners_coverage_area ON partners USING GIST (coverage_area)",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_partners_address ON partners USING GIST (address)",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Partners::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Partners {
    Table,
    Id,
    TradingName,
    OwnerName,
    Document,
    CoverageArea,
    Address,
}

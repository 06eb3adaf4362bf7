#[cfg(test)]
pub mod fixtures {
    use crate::{
        connection::{ConnectionRef, OfflineConnection},
        expression::QueryExpression,
        heading::{AttributeType, TableDefinition},
    };

    pub fn subject() -> TableDefinition {
        TableDefinition::new("lab", "subject")
            .primary("subject_id", AttributeType::Int)
            .secondary("species", AttributeType::String)
            .secondary("sex", AttributeType::String)
    }

    pub fn session() -> TableDefinition {
        TableDefinition::new("lab", "session")
            .foreign_key(&subject(), true)
            .primary("session_idx", AttributeType::Int)
            .secondary("session_date", AttributeType::Date)
    }

    pub fn scan() -> TableDefinition {
        TableDefinition::new("imaging", "scan")
            .foreign_key(&session(), true)
            .primary("scan_idx", AttributeType::Int)
            .nullable("quality", AttributeType::Float)
            .hidden("_acquired", AttributeType::DateTime)
    }

    pub fn equipment() -> TableDefinition {
        TableDefinition::new("lab", "equipment")
            .primary("rig_id", AttributeType::Int)
            .secondary("model", AttributeType::String)
    }

    pub fn table(conn: &ConnectionRef, definition: TableDefinition) -> QueryExpression {
        QueryExpression::table(conn, &definition).unwrap()
    }

    pub struct Lab {
        pub conn: ConnectionRef,
        pub subject: QueryExpression,
        pub session: QueryExpression,
        pub scan: QueryExpression,
    }

    /// subject <- session <- scan, all on one offline session
    pub fn lab() -> Lab {
        let conn = OfflineConnection::new();
        Lab {
            subject: table(&conn, subject()),
            session: table(&conn, session()),
            scan: table(&conn, scan()),
            conn,
        }
    }

    /// Parents `x`, `y`, `z` whose keys the `a_*` / `b_*` tables inherit.
    /// Names read `<table>_<key attributes>_<secondary attributes>`.
    pub struct Xyz {
        x: TableDefinition,
        y: TableDefinition,
        z: TableDefinition,
    }

    impl Xyz {
        pub fn a_xy(&self) -> TableDefinition {
            TableDefinition::new("t", "a").foreign_key(&self.x, true).foreign_key(&self.y, true)
        }

        pub fn a_xy_z(&self) -> TableDefinition {
            self.a_xy().foreign_key(&self.z, false)
        }

        pub fn b_xz_y(&self) -> TableDefinition {
            TableDefinition::new("t", "b")
                .foreign_key(&self.x, true)
                .foreign_key(&self.z, true)
                .foreign_key(&self.y, false)
        }

        pub fn b_yz_x(&self) -> TableDefinition {
            TableDefinition::new("t", "b")
                .foreign_key(&self.y, true)
                .foreign_key(&self.z, true)
                .foreign_key(&self.x, false)
        }

        pub fn b_z_x(&self) -> TableDefinition {
            TableDefinition::new("t", "b").foreign_key(&self.z, true).foreign_key(&self.x, false)
        }
    }

    pub fn xyz() -> (ConnectionRef, Xyz) {
        let parent = |name: &str| TableDefinition::new("t", name).primary(name, AttributeType::Int);
        (OfflineConnection::new(), Xyz { x: parent("x"), y: parent("y"), z: parent("z") })
    }
}

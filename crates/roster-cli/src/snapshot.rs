use std::fs;

use anyhow::Context;
use chrono::NaiveDate;

use roster_store::{BranchSnapshot, MemoryBranch};
use roster_types::{
    BranchId, EmployeeCode, EmployeeRecord, EmployeeStatus, Passport, PositionCode, PositionRecord,
};

/// Load a branch from its JSON snapshot file.
pub fn load_branch(path: &str) -> anyhow::Result<MemoryBranch> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading branch snapshot {path}"))?;
    let snapshot: BranchSnapshot =
        serde_json::from_str(&data).with_context(|| format!("parsing branch snapshot {path}"))?;
    Ok(MemoryBranch::from_snapshot(snapshot))
}

/// Write a branch back to its JSON snapshot file.
pub fn save_branch(path: &str, branch: &MemoryBranch) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(&branch.snapshot())?;
    fs::write(path, data).with_context(|| format!("writing branch snapshot {path}"))?;
    Ok(())
}

/// The demo rosters: four shared positions, two employees per branch,
/// disjoint 1xxx/2xxx code ranges.
pub fn seed_branches() -> (MemoryBranch, MemoryBranch) {
    let a = MemoryBranch::from_snapshot(BranchSnapshot {
        branch: BranchId::new(1),
        employees: vec![
            seed_employee(1, 1001, ("Иван", "Иванов", "Иванович"), (1990, 1, 1), "1234567890", 1),
            seed_employee(1, 1002, ("Петр", "Петров", "Петрович"), (1991, 2, 2), "1111111111", 2),
        ],
        positions: seed_positions(BranchId::new(1)),
        history: Vec::new(),
        conflicts: Vec::new(),
    });
    let b = MemoryBranch::from_snapshot(BranchSnapshot {
        branch: BranchId::new(2),
        employees: vec![
            seed_employee(2, 2001, ("Мария", "Сидорова", "Ивановна"), (1992, 3, 3), "2222222222", 3),
            seed_employee(2, 2002, ("Анна", "Смирнова", "Петровна"), (1993, 4, 4), "3333333333", 4),
        ],
        positions: seed_positions(BranchId::new(2)),
        history: Vec::new(),
        conflicts: Vec::new(),
    });
    (a, b)
}

fn seed_positions(branch: BranchId) -> Vec<PositionRecord> {
    [(1, "Менеджер"), (2, "Разработчик"), (3, "Аналитик"), (4, "Дизайнер")]
        .into_iter()
        .map(|(code, name)| PositionRecord {
            branch,
            code: PositionCode::new(code),
            name: name.to_owned(),
            parent: None,
        })
        .collect()
}

fn seed_employee(
    branch: u32,
    code: u32,
    full_name: (&str, &str, &str),
    birth: (i32, u32, u32),
    passport: &str,
    position: u32,
) -> EmployeeRecord {
    let (name, surname, patronymic) = full_name;
    EmployeeRecord {
        branch: BranchId::new(branch),
        code: EmployeeCode::new(code),
        name: name.to_owned(),
        surname: surname.to_owned(),
        patronymic: patronymic.to_owned(),
        birth_date: NaiveDate::from_ymd_opt(birth.0, birth.1, birth.2).expect("valid seed date"),
        passport: Passport::new(passport).expect("valid seed passport"),
        position: PositionCode::new(position),
        status: EmployeeStatus::Active,
    }
}

//! Creates and seeds the university database with a small demo data set:
//! two students, their transcripts, professors, courses and the course
//! offerings of three semesters.
//!
//! Seeding is idempotent. Tables are created with `IF NOT EXISTS` and every
//! row carries an explicit key inserted with `INSERT OR IGNORE`, so running
//! it against an existing file only fills in what is missing.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

/// Row counts after seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub students: i64,
    pub transcripts: i64,
    pub professors: i64,
    pub courses: i64,
    pub course_offerings: i64,
}

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        username          TEXT NOT NULL UNIQUE,
        password_hash     TEXT DEFAULT NULL,
        email             TEXT NOT NULL UNIQUE,
        full_name         TEXT NOT NULL,
        program           TEXT NOT NULL,
        specialization    TEXT,
        semester_enrolled TEXT NOT NULL,
        gpa               REAL,
        credits_completed INTEGER DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS professors (
        id          INTEGER PRIMARY KEY,
        username    TEXT NOT NULL UNIQUE,
        full_name   TEXT NOT NULL,
        affiliation TEXT NOT NULL,
        title       TEXT NOT NULL,
        office      TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        course_id   TEXT PRIMARY KEY,
        course_name TEXT NOT NULL,
        department  TEXT NOT NULL,
        credits     INTEGER NOT NULL,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS course_offerings (
        offering_id       INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id         TEXT NOT NULL,
        professor_id      INTEGER NOT NULL,
        semester          TEXT NOT NULL,
        schedule          TEXT,
        location          TEXT,
        max_students      INTEGER,
        enrolled_students INTEGER,
        FOREIGN KEY (course_id) REFERENCES courses(course_id),
        FOREIGN KEY (professor_id) REFERENCES professors(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transcripts (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id  INTEGER NOT NULL,
        offering_id INTEGER NOT NULL,
        grade       TEXT NOT NULL,
        FOREIGN KEY (student_id) REFERENCES students(id),
        FOREIGN KEY (offering_id) REFERENCES course_offerings(offering_id)
    )
    "#,
];

// (id, username, email, full_name, program, specialization, gpa, semester, credits)
const STUDENTS: [(i64, &str, &str, &str, &str, &str, f64, &str, i64); 2] = [
    (1, "lea07", "hyunjuji0819@gmail.com", "Lea Ji", "ms-cs", "Machine Learning", 4.0, "Fall 2024", 15),
    (2, "woohyun12", "ji819kr@gmail.com", "Woohyun Noh", "ms-cs", "Robotics", 4.0, "Fall 2024", 18),
];

const PROFESSORS: [(i64, &str, &str, &str, &str, Option<&str>); 16] = [
    (1, "mahdir", "Mahdi Roozbahani", "School of Computational Science and Engineering", "lecturer", None),
    (2, "john.stasko", "John Stasko", "School of Interactive Computing", "Professor", Some("TSRB 355")),
    (3, "varma", "Sashank Varma", "School of Interactive Computing", "Professor", None),
    (4, "hays", "James Hays", "School of Interactive Computing", "Associate Professor", Some("CODA 11th floor")),
    (5, "ashok.goel", "Ashok Goel", "School of Computational Science and Engineering", "Professor", None),
    (6, "matthew.gombolay", "Matthew Gombolay", "School of Interactive Computing", "Associate Professor", None),
    (7, "sehoonha", "Sehoon Ha", "School of Interactive Computing", "Assistant Professor", Some("Klaus 3226")),
    (8, "ssingla7", "Sahil Singla", "School of Computer Science", "Assistant Professor", Some("Klaus 2142")),
    (9, "harish.ravichandar", "Harish Ravichandar", "School of Interactive Computing", "Assistant Professor", None),
    (10, "shi", "Humphrey Shi", "School of Interactive Computing", "Associate Professor", None),
    (11, "chernova", "Sonia Chernova", "School of Interactive Computing", "Associate Professor", None),
    (12, "thomas.ploetz", "Thomas Ploetz", "School of Interactive Computing", "Professor", None),
    (13, "wei.xu", "Wei Xu", "School of Interactive Computing", "Associate Professor", None),
    (14, "nimam6", "Nabil Imam", "School of Computational Science and Engineering", "Assistant Professor", None),
    (15, "danfei", "Danfei Xu", "School of Interactive Computing", "Assistant Professor", None),
    (16, "wenke.lee", "Wenke Lee", "School of Computer Science", "Professor", None),
];

const CS: &str = "Computer Science";

const COURSES: [(&str, &str, &str, i64, &str); 16] = [
    ("CS6515", "Introduction to Graduate Algorithms", CS, 3, "Advanced study of algorithm design and analysis techniques."),
    ("CS7496", "Computer Animation", CS, 3, "Introduction to computer animation techniques and applications."),
    ("CS7633", "Human-Robot Interaction", CS, 3, "Human-robot interaction and collaboration."),
    ("CS7631", "Multi-Robot Systems", CS, 3, "Multi-robot systems and their applications."),
    ("CS6601", "Artificial Intelligence", CS, 3, "Introduction to artificial intelligence concepts and techniques."),
    ("CS7641", "Machine Learning", CS, 3, "Introduction to machine learning algorithms and applications."),
    ("CS7651", "Human and Machine Learning", CS, 3, "Fundamentals of human and machine learning in cognitive science view."),
    ("CS6730", "Data Visualization Principles", CS, 3, "Principles and techniques for effective data visualization."),
    ("CS7637", "Knowledge-Based AI", CS, 3, "Introduction to knowledge-based AI systems and applications."),
    ("CS7650", "Natural Language", CS, 3, "Introduction to natural language processing and understanding."),
    ("CSE6140", "Computational Science and Engineering Algorithms", "Computational Science and Engineering", 3, "Introduction to computational science and engineering algorithms."),
    ("CS7643", "Deep Learning", CS, 3, "Introduction to deep learning and neural networks."),
    ("CS8803-DRL", "Deep Reinforcement Learning", CS, 3, "Introduction to deep reinforcement learning techniques and applications."),
    ("CS7648", "Interactive Robo Learn", CS, 3, "Introduction to interactive robot learning techniques and applications."),
    ("CS6476", "Computer Vision", CS, 3, "Computer vision techniques and applications."),
    ("CS6035", "Intro To Info Security", CS, 3, "Introduction to information security concepts and techniques."),
];

// (offering_id, course_id, professor_id, semester, schedule, location, max, enrolled)
const OFFERINGS: [(i64, &str, i64, &str, &str, &str, i64, i64); 17] = [
    (1, "CS7641", 1, "Fall 2024", "Mon/Wed 12:30 - 13:45", "Scheller College of Business 100", 315, 315),
    (2, "CS7651", 3, "Fall 2024", "Tue/Thu 17:00 - 18:15", "Scheller College of Business 202", 50, 49),
    (3, "CS6730", 2, "Fall 2024", "Tue/Thu 14:00 - 15:15", "Instructional Center 211", 110, 100),
    (4, "CS7496", 7, "Fall 2024", "Mon/Wed/Fri 11:00 - 11:50", "Scheller College of Business 300", 42, 41),
    (5, "CS6476", 10, "Fall 2024", "Tue/Thu 11:00 - 12:15", "College of Computing 16", 239, 239),
    (6, "CS6476", 4, "Spring 2025", "Mon/Wed 15:30 - 16:45", "College of Computing 16", 250, 246),
    (7, "CS7637", 5, "Spring 2025", "Mon/Wed 14:00 - 15:15", "Scheller College of Business 300", 76, 73),
    (8, "CS7648", 6, "Spring 2025", "Mon/Wed 09:30 - 10:45", "Skiles 254", 30, 26),
    (9, "CS8803-DRL", 7, "Spring 2025", "Tue/Thu 11:00 - 12:15", "Molecular Sciences and Engr G011", 150, 136),
    (10, "CS7631", 9, "Spring 2025", "Mon/Wed 14:00 - 15:15", "Scheller College of Business 223", 50, 48),
    (11, "CS6515", 8, "Fall 2025", "Tue/Thu 15:30 - 16:45", "Clough UG Learning Commons 152", 180, 150),
    (12, "CS7633", 11, "Fall 2025", "Mon/Wed 14:00 - 15:15", "Instructional Center 109", 60, 48),
    (13, "CS6601", 12, "Fall 2025", "Tue/Thu 14:00 - 15:15", "Howey Physics L1", 240, 160),
    (14, "CS7650", 13, "Fall 2025", "Mon/Wed 14:00 - 15:15", "Howey Physics L3", 130, 129),
    (15, "CSE6140", 14, "Fall 2025", "Mon/Wed 11:00 - 12:15", "Paper Tricentennial 109", 25, 20),
    (16, "CS7643", 15, "Fall 2025", "Mon/Wed 15:30 - 16:45", "Clough UG Learning Commons 144", 150, 149),
    (17, "CS6035", 16, "Fall 2025", "Tue/Thu 14:00 - 15:15", "Scheller College of Business 300", 120, 18),
];

// (id, student_id, offering_id, grade)
const TRANSCRIPTS: [(i64, i64, i64, &str); 11] = [
    (1, 1, 1, "A"),
    (2, 1, 2, "A"),
    (3, 1, 3, "A"),
    (4, 1, 6, "A"),
    (5, 1, 7, "A"),
    (6, 2, 1, "A"),
    (7, 2, 4, "A"),
    (8, 2, 5, "A"),
    (9, 2, 8, "A"),
    (10, 2, 9, "A"),
    (11, 2, 10, "A"),
];

/// Create the database file (and its parent directory) if needed, create the
/// tables and insert the demo rows.
pub async fn seed_database(path: &Path) -> Result<SeedReport, sqlx::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let mut tx = pool.begin().await?;

    for ddl in SCHEMA {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }

    for (id, username, email, name, program, specialization, gpa, semester, credits) in STUDENTS {
        sqlx::query(
            "INSERT OR IGNORE INTO students \
             (id, username, email, full_name, program, specialization, gpa, semester_enrolled, credits_completed) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(name)
        .bind(program)
        .bind(specialization)
        .bind(gpa)
        .bind(semester)
        .bind(credits)
        .execute(&mut *tx)
        .await?;
    }

    for (id, username, name, affiliation, title, office) in PROFESSORS {
        sqlx::query(
            "INSERT OR IGNORE INTO professors (id, username, full_name, affiliation, title, office) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(name)
        .bind(affiliation)
        .bind(title)
        .bind(office)
        .execute(&mut *tx)
        .await?;
    }

    for (course_id, name, department, credits, description) in COURSES {
        sqlx::query(
            "INSERT OR IGNORE INTO courses (course_id, course_name, department, credits, description) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(course_id)
        .bind(name)
        .bind(department)
        .bind(credits)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    }

    for (id, course_id, professor_id, semester, schedule, location, max, enrolled) in OFFERINGS {
        sqlx::query(
            "INSERT OR IGNORE INTO course_offerings \
             (offering_id, course_id, professor_id, semester, schedule, location, max_students, enrolled_students) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(course_id)
        .bind(professor_id)
        .bind(semester)
        .bind(schedule)
        .bind(location)
        .bind(max)
        .bind(enrolled)
        .execute(&mut *tx)
        .await?;
    }

    for (id, student_id, offering_id, grade) in TRANSCRIPTS {
        sqlx::query(
            "INSERT OR IGNORE INTO transcripts (id, student_id, offering_id, grade) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(student_id)
        .bind(offering_id)
        .bind(grade)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let mut counts = [0i64; 5];
    for (count, table) in counts.iter_mut().zip([
        "students",
        "transcripts",
        "professors",
        "courses",
        "course_offerings",
    ]) {
        *count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await?;
    }
    pool.close().await;

    let [students, transcripts, professors, courses, course_offerings] = counts;
    info!(path = %path.display(), students, courses, course_offerings, "University database seeded");

    Ok(SeedReport {
        students,
        transcripts,
        professors,
        courses,
        course_offerings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::university_db::UniversityDb;
    use switchyard_config::DatabaseConfig;

    fn expected() -> SeedReport {
        SeedReport {
            students: 2,
            transcripts: 11,
            professors: 16,
            courses: 16,
            course_offerings: 17,
        }
    }

    #[tokio::test]
    async fn creates_and_seeds_a_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("university.db");

        let report = seed_database(&path).await.unwrap();
        assert_eq!(report, expected());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn seeding_twice_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("university.db");

        seed_database(&path).await.unwrap();
        let report = seed_database(&path).await.unwrap();
        assert_eq!(report, expected());
    }

    #[tokio::test]
    async fn seeded_file_answers_transcript_queries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("university.db");
        seed_database(&path).await.unwrap();

        let db = UniversityDb::open(&DatabaseConfig {
            path,
            read_only: true,
            schema_sample_rows: 3,
        });
        let result = db
            .query(
                "SELECT c.course_id FROM courses c \
                 JOIN course_offerings co ON c.course_id = co.course_id \
                 JOIN transcripts t ON co.offering_id = t.offering_id \
                 JOIN students s ON t.student_id = s.id \
                 WHERE s.full_name = 'Lea Ji' ORDER BY c.course_id",
            )
            .await
            .unwrap();
        assert_eq!(result.columns, vec!["course_id"]);
        let ids: Vec<&str> = result.rows.iter().map(|r| r[0].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["CS6476", "CS6730", "CS7637", "CS7641", "CS7651"]);

        let schema = db.describe().await.unwrap();
        for table in ["course_offerings", "courses", "professors", "students", "transcripts"] {
            assert!(schema.contains(&format!("Table `{table}` columns:")), "{table}");
        }
    }
}

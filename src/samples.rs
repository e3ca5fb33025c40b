//! First-run content for each tracker, shown until the user edits it.

use crate::models::{
    Book, Course, ExerciseSchedule, FamilyCategory, FamilyTask, FutureProject, Priority, Project,
    ProjectStatus, ResponsibilityTask, Shelf, Subject, TodoItem, Weekday,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn family_tasks() -> Vec<FamilyTask> {
    vec![
        FamilyTask {
            id: 1,
            title: "خرید هفتگی".into(),
            description: "تهیه مواد غذایی و اقلام ضروری منزل".into(),
            assigned_to: "پدر".into(),
            due_date: "1402/09/15".into(),
            category: FamilyCategory::Shopping,
            completed: false,
        },
        FamilyTask {
            id: 2,
            title: "نظافت منزل".into(),
            description: "تمیز کردن اتاق‌ها و گردگیری".into(),
            assigned_to: "مادر".into(),
            due_date: "1402/09/14".into(),
            category: FamilyCategory::Cleaning,
            completed: true,
        },
    ]
}

pub fn responsibility_tasks() -> Vec<ResponsibilityTask> {
    vec![
        ResponsibilityTask {
            id: 1,
            title: "طراحی لوگو پروژه".into(),
            description: "طراحی لوگو با رنگ‌های برند".into(),
            priority: Priority::High,
            deadline: "1402/09/15".into(),
            start_date: "1402/09/01".into(),
            start_time: "09:00".into(),
            end_date: "1402/09/15".into(),
            end_time: "18:00".into(),
            category: "design".into(),
            completed: false,
        },
        ResponsibilityTask {
            id: 2,
            title: "طراحی رابط کاربری صفحه اصلی".into(),
            description: "طراحی UI صفحه اصلی وبسایت".into(),
            priority: Priority::Medium,
            deadline: "1402/09/20".into(),
            start_date: "1402/09/05".into(),
            start_time: "10:00".into(),
            end_date: "1402/09/20".into(),
            end_time: "17:00".into(),
            category: "ui".into(),
            completed: true,
        },
    ]
}

pub fn library_books() -> Vec<Book> {
    let book = |id, title: &str, author: &str, shelf, progress, rating| Book {
        id,
        title: title.into(),
        author: author.into(),
        shelf,
        progress,
        rating,
    };
    vec![
        book(1, "صد سال تنهایی", "گابریل گارسیا مارکز", Shelf::Reading, Some(65.0), None),
        book(2, "کیمیاگر", "پائولو کوئلیو", Shelf::Reading, Some(30.0), None),
        book(3, "1984", "جورج اورول", Shelf::Completed, None, Some(5)),
        book(4, "بوف کور", "صادق هدایت", Shelf::Completed, None, Some(4)),
        book(5, "شازده کوچولو", "آنتوان دو سنت‌اگزوپری", Shelf::ToRead, None, None),
        book(6, "جنایات و مکافات", "فئودور داستایوفسکی", Shelf::ToRead, None, None),
    ]
}

fn todos(items: &[(&str, bool)]) -> Vec<TodoItem> {
    items
        .iter()
        .zip(1..)
        .map(|(&(text, completed), id)| TodoItem {
            id,
            text: text.into(),
            completed,
        })
        .collect()
}

pub fn library_todos() -> Vec<TodoItem> {
    todos(&[
        ("خواندن 30 صفحه از کیمیاگر", false),
        ("مرور یادداشت‌های صد سال تنهایی", true),
        ("خرید کتاب جدید", false),
    ])
}

pub fn exercise_todos() -> Vec<TodoItem> {
    todos(&[
        ("تمرین سینه و جلو بازو", false),
        ("تمرین پا", true),
        ("45 دقیقه کاردیو", false),
    ])
}

pub fn exercise_schedule() -> ExerciseSchedule {
    let plan: [(Weekday, &[&str]); 7] = [
        (Weekday::Saturday, &["پرس سینه - 3×12", "جلو بازو - 4×10", "زیر بغل - 3×12"]),
        (Weekday::Sunday, &["اسکوات - 4×10", "جلو پا - 3×12", "ساق پا - 4×15"]),
        (Weekday::Monday, &["شنا - 3×15", "پشت بازو - 4×12", "سرشانه - 3×12"]),
        (Weekday::Tuesday, &["ددلیفت - 3×10", "پشت پا - 4×12", "ساق پا - 3×15"]),
        (Weekday::Wednesday, &["پرس سینه - 4×10", "سرشانه - 3×12", "جلو بازو - 3×12"]),
        (Weekday::Thursday, &["اسکوات - 3×12", "پشت پا - 4×10", "ساق پا - 4×15"]),
        (Weekday::Friday, &["استراحت"]),
    ];
    ExerciseSchedule {
        days: plan.into_iter().map(|(day, entries)| (day, strings(entries))).collect(),
    }
}

pub fn courses() -> Vec<Course> {
    vec![
        Course {
            id: 1,
            name: "React.js پیشرفته".into(),
            platform: "Udemy".into(),
            progress: 100.0,
            completion_date: "1402/08/15".into(),
            certificate: true,
        },
        Course {
            id: 2,
            name: "Node.js و Express".into(),
            platform: "Pluralsight".into(),
            progress: 75.0,
            completion_date: "در حال انجام".into(),
            certificate: false,
        },
    ]
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: 1,
            name: "سیستم مدیریت آموزش".into(),
            status: ProjectStatus::Completed,
            technologies: strings(&["React", "Node.js", "MongoDB"]),
            description: "یک پلتفرم آموزش آنلاین با قابلیت مدیریت دوره‌ها و دانشجویان".into(),
            github: "github.com/example/lms".into(),
        },
        Project {
            id: 2,
            name: "اپلیکیشن موبایل فروشگاهی".into(),
            status: ProjectStatus::InProgress,
            technologies: strings(&["React Native", "Firebase"]),
            description: "اپلیکیشن فروشگاه آنلاین با امکان پرداخت و پیگیری سفارشات".into(),
            github: "github.com/example/shop-app".into(),
        },
    ]
}

pub fn future_projects() -> Vec<FutureProject> {
    vec![FutureProject {
        id: 1,
        name: "پلتفرم همکاری تیمی".into(),
        description: "سیستم مدیریت پروژه و همکاری تیمی با قابلیت چت و تقویم".into(),
        technologies: strings(&["Vue.js", "GraphQL", "PostgreSQL"]),
        priority: "بالا".into(),
    }]
}

pub fn subjects() -> Vec<Subject> {
    let subject = |id, name: &str, grade, progress| Subject {
        id,
        name: name.into(),
        weekly_hours: vec![0.0; 7],
        grade,
        progress,
    };
    vec![
        subject(1, "ریاضی", 18.0, 75.0),
        subject(2, "فیزیک", 17.0, 60.0),
        subject(3, "شیمی", 19.0, 85.0),
    ]
}

//! Initial tributes for an empty database.

use chrono::NaiveDate;
use memorial_victims_models::NewVictim;

struct Seed {
    name: &'static str,
    age: u32,
    neighborhood: &'static str,
    date: (i32, u32, u32),
    tribute: &'static str,
    submitted_by: &'static str,
}

const SEEDS: [Seed; 6] = [
    Seed {
        name: "João da Silva Santos",
        age: 25,
        neighborhood: "Liberdade",
        date: (2024, 8, 15),
        tribute: "Filho dedicado, sempre ajudou a família. Sonhava em ser professor. Era conhecido por todos no bairro pela sua bondade e sempre estava disposto a ajudar quem precisava.",
        submitted_by: "Família Santos",
    },
    Seed {
        name: "Maria Conceição Oliveira",
        age: 32,
        neighborhood: "Subúrbio Ferroviário",
        date: (2024, 7, 22),
        tribute: "Mãe de três filhos, trabalhava como enfermeira no Hospital Roberto Santos. Uma guerreira que dedicou sua vida a cuidar dos outros e de sua família com muito amor.",
        submitted_by: "Irmã Carla",
    },
    Seed {
        name: "Carlos Eduardo Lima",
        age: 19,
        neighborhood: "Centro Histórico",
        date: (2024, 9, 3),
        tribute: "Jovem talentoso, estudante de música na UFBA. Tocava violão nas praças do Centro Histórico e sonhava em formar uma banda. Sua música alegrava o coração de todos.",
        submitted_by: "Amigos da UFBA",
    },
    Seed {
        name: "Ana Paula Santos",
        age: 28,
        neighborhood: "Cajazeiras",
        date: (2024, 6, 18),
        tribute: "Professora dedicada, formada em Pedagogia. Trabalhava em uma escola municipal e era amada por todos os alunos. Deixa uma filha de 5 anos.",
        submitted_by: "Colegas de trabalho",
    },
    Seed {
        name: "Roberto Silva Pereira",
        age: 35,
        neighborhood: "Brotas",
        date: (2024, 5, 12),
        tribute: "Pai de família exemplar, trabalhava como mecânico. Sempre disposto a ajudar os vizinhos e amigos. Era conhecido pela sua generosidade e bom humor.",
        submitted_by: "Vizinhos",
    },
    Seed {
        name: "Lucia Santos Pereira",
        age: 41,
        neighborhood: "Brotas",
        date: (2024, 4, 8),
        tribute: "Professora da rede pública, dedicou 15 anos da sua vida à educação. Transformou a vida de centenas de crianças com seu carinho e dedicação ao ensino.",
        submitted_by: "Escola Municipal Castro Alves",
    },
];

/// The seed tributes, in insertion order.
#[must_use]
pub fn seed_victims() -> Vec<NewVictim> {
    SEEDS
        .iter()
        .filter_map(|seed| {
            let (year, month, day) = seed.date;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(NewVictim {
                name: seed.name.to_string(),
                age: seed.age,
                neighborhood: seed.neighborhood.to_string(),
                date,
                tribute: seed.tribute.to_string(),
                submitted_by: seed.submitted_by.to_string(),
                image: None,
            })
        })
        .collect()
}

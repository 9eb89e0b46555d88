//! Static neighborhood and landmark tables.

use memorial_geography_models::{Coordinate, Landmark, Neighborhood, ViolenceLevel};

/// Neighborhoods shown on the map.
pub static NEIGHBORHOODS: [Neighborhood; 9] = [
    Neighborhood {
        id: "centro-historico",
        name: "Centro Histórico",
        lat: -12.967,
        lng: -38.5,
        population: 45_000,
        violence_share: 0.18,
        description: "Região central de Salvador, com alta concentração comercial e turística. Apresenta índices elevados de violência urbana.",
        level: ViolenceLevel::High,
    },
    Neighborhood {
        id: "liberdade",
        name: "Liberdade",
        lat: -12.950_018,
        lng: -38.503_51,
        population: 32_000,
        violence_share: 0.16,
        description: "Bairro tradicional de Salvador, berço da cultura afro-brasileira. Enfrenta desafios socioeconômicos significativos.",
        level: ViolenceLevel::High,
    },
    Neighborhood {
        id: "suburbio",
        name: "Subúrbio Ferroviário",
        lat: -12.879_72,
        lng: -38.468_89,
        population: 28_000,
        violence_share: 0.14,
        description: "Região periférica com densidade populacional alta. Necessita de maior investimento em segurança pública.",
        level: ViolenceLevel::Medium,
    },
    Neighborhood {
        id: "cajazeiras",
        name: "Cajazeiras",
        lat: -12.899_94,
        lng: -38.408_16,
        population: 35_000,
        violence_share: 0.12,
        description: "Bairro em expansão na periferia de Salvador. Apresenta crescimento urbano desordenado.",
        level: ViolenceLevel::Medium,
    },
    Neighborhood {
        id: "itapua",
        name: "Itapuã",
        lat: -12.937_16,
        lng: -38.355_67,
        population: 42_000,
        violence_share: 0.08,
        description: "Bairro litorâneo famoso pelas praias e cultura local. Região turística com índices menores de violência.",
        level: ViolenceLevel::Low,
    },
    Neighborhood {
        id: "brotas",
        name: "Brotas",
        lat: -12.985_76,
        lng: -38.499_82,
        population: 38_000,
        violence_share: 0.10,
        description: "Bairro de classe média com boa infraestrutura. Apresenta índices moderados de criminalidade.",
        level: ViolenceLevel::Low,
    },
    Neighborhood {
        id: "barra",
        name: "Barra",
        lat: -13.010_35,
        lng: -38.532_92,
        population: 30_000,
        violence_share: 0.06,
        description: "Área nobre e turística de Salvador. Concentra hotéis, restaurantes e vida noturna.",
        level: ViolenceLevel::Low,
    },
    Neighborhood {
        id: "periperi",
        name: "Periperi",
        lat: -12.863_36,
        lng: -38.473_67,
        population: 25_000,
        violence_share: 0.09,
        description: "Bairro do subúrbio ferroviário com características industriais e residenciais populares.",
        level: ViolenceLevel::Medium,
    },
    Neighborhood {
        id: "fazenda-grande",
        name: "Fazenda Grande",
        lat: -12.942_8,
        lng: -38.477_37,
        population: 33_000,
        violence_share: 0.07,
        description: "Bairro popular com grande densidade demográfica e desafios de infraestrutura urbana.",
        level: ViolenceLevel::Medium,
    },
];

/// Reference landmarks.
pub static LANDMARKS: [Landmark; 6] = [
    Landmark {
        id: "pelourinho",
        name: "Pelourinho",
        lat: -12.9714,
        lng: -38.5145,
    },
    Landmark {
        id: "elevador-lacerda",
        name: "Elevador Lacerda",
        lat: -12.9735,
        lng: -38.5108,
    },
    Landmark {
        id: "farol-barra",
        name: "Farol da Barra",
        lat: -13.0106,
        lng: -38.5326,
    },
    Landmark {
        id: "itapua",
        name: "Itapuã",
        lat: -12.945,
        lng: -38.365,
    },
    Landmark {
        id: "cajazeiras",
        name: "Cajazeiras",
        lat: -12.95,
        lng: -38.32,
    },
    Landmark {
        id: "liberdade",
        name: "Liberdade",
        lat: -12.935,
        lng: -38.525,
    },
];

/// Neighborhood centres followed by landmarks, as named points.
#[must_use]
pub fn reference_coordinates() -> Vec<Coordinate> {
    let centres = NEIGHBORHOODS.iter().map(|n| Coordinate {
        lat: n.lat,
        lng: n.lng,
        name: n.name.to_string(),
    });
    let landmarks = LANDMARKS.iter().map(|l| Coordinate {
        lat: l.lat,
        lng: l.lng,
        name: l.name.to_string(),
    });
    centres.chain(landmarks).collect()
}

/// A canned persona and job pair.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub name: &'static str,
    pub persona: &'static str,
    pub job: &'static str,
}

pub const SAMPLES: [Sample; 3] = [
    Sample {
        name: "academic",
        persona: "PhD Researcher in Computational Biology with expertise in machine learning applications for drug discovery. Specialized in graph neural networks, molecular representation learning, and biomedical data analysis with 5+ years of research experience.",
        job: "Prepare a comprehensive literature review focusing on methodologies, datasets, and performance benchmarks for Graph Neural Networks applied to drug discovery. Need to identify key approaches, compare model architectures, and summarize evaluation metrics.",
    },
    Sample {
        name: "business",
        persona: "Senior Investment Analyst with 7+ years experience in technology sector analysis. Expert in financial modeling, market analysis, competitive intelligence, and ESG evaluation for public companies. CFA certified with focus on growth companies.",
        job: "Analyze revenue trends, R&D investments, market positioning strategies, and competitive advantages across tech companies for investment recommendations. Focus on identifying growth catalysts and risk factors.",
    },
    Sample {
        name: "education",
        persona: "Third-year Undergraduate Chemistry Student specializing in organic chemistry and reaction mechanisms. Strong background in general chemistry, currently taking advanced organic synthesis and physical chemistry courses.",
        job: "Identify and summarize key concepts and mechanisms for comprehensive exam preparation on reaction kinetics, with particular emphasis on rate laws, activation energy, catalysis mechanisms, and temperature effects on reaction rates.",
    },
];

pub fn find(name: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.name == name)
}
